// Module midi - Command encoding and the output sink

pub mod event;
pub mod output;

pub use event::MidiEvent;
pub use output::{MidiSink, MidirSink, SinkError};
