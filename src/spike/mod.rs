// Module spike - Event sources, identity mapping and listener plumbing

pub mod event;
pub mod listener;
pub mod mapper;
pub mod rate;
pub mod replay;

pub use event::{SpikeEvent, SpikeId};
pub use listener::{SpikeListener, SpikeNotifier};
pub use mapper::NoteMapper;
pub use rate::SpikeRateMonitor;
pub use replay::{ReplaySource, poisson_spike_train};

use thiserror::Error;

/// Spike-side errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpikeError {
    #[error("No note mapping for spike source {0}")]
    UnmappedSpike(SpikeId),

    #[error("Mapped note {note} for spike source {source} is outside the MIDI range 0-127")]
    NoteOutOfRange { source: SpikeId, note: u8 },

    #[error("Scheduler worker is no longer running")]
    SchedulerStopped,
}

pub type SpikeResult<T> = Result<T, SpikeError>;
