// Spike rate monitor - sliding-window event rate tracking
//
// Shares the measured rate between the source thread and observers.
// Attachable as a listener so a notifier can feed it directly.

use crate::spike::event::SpikeEvent;
use crate::spike::listener::SpikeListener;
use crate::spike::SpikeError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sliding-window spike rate estimate.
///
/// Thread-safe: clones share the same window.
#[derive(Clone)]
pub struct SpikeRateMonitor {
    window: Duration,
    samples: Arc<Mutex<VecDeque<Instant>>>,
}

impl SpikeRateMonitor {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            samples: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Record one spike at the current instant
    pub fn record(&self) {
        let now = Instant::now();
        if let Ok(mut samples) = self.samples.lock() {
            samples.push_back(now);
            Self::prune(&mut samples, now, self.window);
        }
    }

    /// Number of spikes observed over the last window
    pub fn rate(&self) -> usize {
        let now = Instant::now();
        match self.samples.lock() {
            Ok(mut samples) => {
                Self::prune(&mut samples, now, self.window);
                samples.len()
            }
            Err(_) => 0,
        }
    }

    fn prune(samples: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(&front) = samples.front() {
            if now.duration_since(front) > window {
                samples.pop_front();
            } else {
                break;
            }
        }
    }
}

impl SpikeListener for SpikeRateMonitor {
    fn on_spike(&self, _event: &SpikeEvent) -> Result<(), SpikeError> {
        self.record();
        Ok(())
    }
}
