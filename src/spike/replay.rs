// Replay source - streams a recorded spike train to attached listeners

use crate::spike::event::{SpikeEvent, SpikeId};
use crate::spike::listener::{SpikeListener, SpikeNotifier};
use rand::Rng;
use std::thread;
use std::time::Duration;

/// Time resolution of generated spike trains, milliseconds
const TRAIN_RESOLUTION_MS: u64 = 1;

/// Replays a recorded `(timestamp, source)` spike train in real time.
///
/// Timestamps are relative to stream start; the train is sorted at
/// construction so recordings do not have to be.
pub struct ReplaySource {
    train: Vec<(Duration, SpikeId)>,
    notifier: SpikeNotifier,
}

impl ReplaySource {
    pub fn new(mut train: Vec<(Duration, SpikeId)>) -> Self {
        train.sort_by_key(|&(at, _)| at);
        Self {
            train,
            notifier: SpikeNotifier::new(),
        }
    }

    pub fn attach(&mut self, listener: Box<dyn SpikeListener>) {
        self.notifier.attach(listener);
    }

    pub fn event_count(&self) -> usize {
        self.train.len()
    }

    /// Stream the whole train, sleeping between consecutive timestamps.
    ///
    /// Listener failures do not abort the stream; the number of failed
    /// notifications is returned so the caller can decide what to do.
    pub fn stream(&self) -> usize {
        let mut failures = 0;
        let mut elapsed = Duration::ZERO;

        for &(at, source) in &self.train {
            if at > elapsed {
                thread::sleep(at - elapsed);
                elapsed = at;
            }
            if self.notifier.notify(&SpikeEvent::new(source)).is_err() {
                failures += 1;
            }
        }
        failures
    }
}

/// Random spike train at the given mean rate, spread over `sources`.
///
/// One Bernoulli draw per resolution step, so the result approximates a
/// Poisson process for rates well below 1/resolution.
pub fn poisson_spike_train(
    rate_hz: f64,
    duration: Duration,
    sources: &[SpikeId],
) -> Vec<(Duration, SpikeId)> {
    let mut train = Vec::new();
    if sources.is_empty() || rate_hz <= 0.0 {
        return train;
    }

    let step_secs = TRAIN_RESOLUTION_MS as f64 / 1000.0;
    let spike_prob = (rate_hz * step_secs).min(1.0);
    let steps = duration.as_millis() as u64 / TRAIN_RESOLUTION_MS;

    let mut rng = rand::thread_rng();
    for i in 0..steps {
        if rng.gen_range(0.0..1.0) < spike_prob {
            let source = sources[rng.gen_range(0..sources.len())];
            train.push((Duration::from_millis(i * TRAIN_RESOLUTION_MS), source));
        }
    }
    train
}
