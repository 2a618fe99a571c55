//! Unit tests for the task lifecycle core.

mod support;
