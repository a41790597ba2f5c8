//! Note agent orchestration and shared handle.

pub mod agent;
pub mod shared;

pub use agent::NoteAgent;
pub use shared::SharedNoteAgent;
