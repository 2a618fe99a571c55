//! In-memory adapters for tests and embedding.

mod api;
mod events;

pub use api::InMemoryTaskApi;
pub use events::RecordingEventSink;
