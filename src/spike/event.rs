// Spike event types

use std::time::Duration;

/// Identity of a spiking source (hardware neuron id, timer slot, ...)
pub type SpikeId = u32;

/// One identity event as delivered by a source.
///
/// Ephemeral: consumed synchronously by the listeners, never stored.
/// Absent attributes resolve to the engine defaults at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpikeEvent {
    pub source: SpikeId,
    pub velocity: Option<u8>,
    pub duration: Option<Duration>,
}

impl SpikeEvent {
    pub fn new(source: SpikeId) -> Self {
        Self {
            source,
            velocity: None,
            duration: None,
        }
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_event_has_no_attributes() {
        let event = SpikeEvent::new(7);
        assert_eq!(event.source, 7);
        assert!(event.velocity.is_none());
        assert!(event.duration.is_none());
    }

    #[test]
    fn test_event_builders() {
        let event = SpikeEvent::new(3)
            .with_velocity(80)
            .with_duration(Duration::from_millis(200));

        assert_eq!(event.velocity, Some(80));
        assert_eq!(event.duration, Some(Duration::from_millis(200)));
    }
}
