// MIDI output sink - sink contract and midir hardware backend

use crate::midi::event::MidiEvent;
use midir::{MidiOutput, MidiOutputConnection};
use thiserror::Error;

/// Output sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to initialise MIDI output: {0}")]
    Init(String),

    #[error("No MIDI output port available")]
    NoPortAvailable,

    #[error("MIDI output port '{0}' not found")]
    PortNotFound(String),

    #[error("Failed to connect to MIDI output port: {0}")]
    Connect(String),

    #[error("Failed to send MIDI message: {0}")]
    Send(String),
}

/// Destination for 3-byte MIDI command buffers.
///
/// The scheduler worker is the only caller apart from the all-notes-off
/// path; per-send failures are reported to the caller, never retried here.
pub trait MidiSink: Send {
    fn send(&mut self, message: &[u8; 3]) -> Result<(), SinkError>;

    fn send_event(&mut self, event: MidiEvent) -> Result<(), SinkError> {
        self.send(&event.to_bytes())
    }
}

/// Hardware MIDI output backed by midir
pub struct MidirSink {
    connection: MidiOutputConnection,
    port_name: String,
}

impl MidirSink {
    /// Connect to the first available MIDI output port
    pub fn open(client_name: &str) -> Result<Self, SinkError> {
        let midi_out =
            MidiOutput::new(client_name).map_err(|e| SinkError::Init(e.to_string()))?;

        let ports = midi_out.ports();
        let port = ports.first().ok_or(SinkError::NoPortAvailable)?;
        let port_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let connection = midi_out
            .connect(port, "neuromidi-output")
            .map_err(|e| SinkError::Connect(e.to_string()))?;

        Ok(Self {
            connection,
            port_name,
        })
    }

    /// Connect to a MIDI output port by name
    pub fn open_port(client_name: &str, device_name: &str) -> Result<Self, SinkError> {
        let midi_out =
            MidiOutput::new(client_name).map_err(|e| SinkError::Init(e.to_string()))?;

        // Chercher le port par nom
        let ports = midi_out.ports();
        let port = ports
            .iter()
            .find(|p| {
                midi_out
                    .port_name(p)
                    .map(|name| name == device_name)
                    .unwrap_or(false)
            })
            .ok_or_else(|| SinkError::PortNotFound(device_name.to_string()))?;

        let connection = midi_out
            .connect(port, "neuromidi-output")
            .map_err(|e| SinkError::Connect(e.to_string()))?;

        Ok(Self {
            connection,
            port_name: device_name.to_string(),
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Close the underlying connection.
    ///
    /// Only reachable once the scheduler has handed the sink back from
    /// `stop()`, so no command can race the close.
    pub fn close(self) {
        self.connection.close();
    }
}

impl MidiSink for MidirSink {
    fn send(&mut self, message: &[u8; 3]) -> Result<(), SinkError> {
        self.connection
            .send(message)
            .map_err(|e| SinkError::Send(e.to_string()))
    }
}
