// NeuroMIDI - Library exports for tests and benchmarks

pub mod engine;
pub mod messaging;
pub mod midi;
pub mod spike;

// Re-export commonly used types for convenience
pub use engine::config::{ConfigError, SonifierConfig};
pub use engine::pending::{NoteRequest, PendingStore};
pub use engine::scheduler::{NoteScheduler, SpikeDispatcher};
pub use messaging::{create_notification_channel, Notification, NotificationCategory};
pub use midi::event::MidiEvent;
pub use midi::output::{MidiSink, MidirSink, SinkError};
pub use spike::{
    NoteMapper, ReplaySource, SpikeError, SpikeEvent, SpikeId, SpikeListener, SpikeNotifier,
    SpikeRateMonitor, poisson_spike_train,
};
