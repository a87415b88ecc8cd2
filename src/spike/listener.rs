// Listener registration - synchronous fan-out to attached listeners

use crate::spike::{SpikeError, SpikeEvent};

/// Synchronous spike consumer.
///
/// `on_spike` runs on the source's notification thread and must not block:
/// a slow listener delays every listener attached after it.
pub trait SpikeListener: Send {
    fn on_spike(&self, event: &SpikeEvent) -> Result<(), SpikeError>;
}

/// Ordered set of listeners, invoked synchronously in attachment order.
#[derive(Default)]
pub struct SpikeNotifier {
    listeners: Vec<Box<dyn SpikeListener>>,
}

impl SpikeNotifier {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn attach(&mut self, listener: Box<dyn SpikeListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify every listener in attachment order.
    ///
    /// A failing listener does not prevent later listeners from running;
    /// the first failure is returned once all of them have been invoked.
    pub fn notify(&self, event: &SpikeEvent) -> Result<(), SpikeError> {
        let mut first_error = None;
        for listener in &self.listeners {
            if let Err(e) = listener.on_spike(event) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
