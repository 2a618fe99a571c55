//! Step definitions for task mutation behaviour tests.

pub mod then;
pub mod when;
pub mod world;
