// Module engine - Configuration, pending store and the note scheduler

pub mod config;
pub mod pending;
pub mod scheduler;

pub use config::{ConfigError, SonifierConfig};
pub use pending::{NoteRequest, PendingStore};
pub use scheduler::{NoteScheduler, SpikeDispatcher};
