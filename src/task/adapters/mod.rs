//! Adapter implementations of the task ports.

pub mod channel;
pub mod memory;

pub use channel::ChannelEventSink;
