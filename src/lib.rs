// TaskList - Single-list task manager persisted to a key-value slot

pub mod app;
pub mod config;
pub mod filter;
pub mod persist;
pub mod prompt;
pub mod slot;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use app::App;
pub use config::{Backend, Config};
pub use filter::{Filter, Match};
pub use persist::Persistence;
pub use prompt::{Prompt, ScriptedPrompt, TerminalPrompt};
pub use slot::{FileSlot, MemorySlot, Slot, SqliteSlot};
pub use store::{EditSession, TaskStore};
pub use task::Task;
