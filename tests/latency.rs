// Integration test: Latency measurement
//
// The dispatch path runs on the event source's notification thread, so it
// has to stay far below the inter-spike interval of a busy source.

use neuromidi::{
    MidiSink, NoteMapper, NoteScheduler, SinkError, SonifierConfig, SpikeEvent,
    create_notification_channel,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone)]
struct RecordingSink {
    messages: Arc<Mutex<Vec<[u8; 3]>>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl MidiSink for RecordingSink {
    fn send(&mut self, message: &[u8; 3]) -> Result<(), SinkError> {
        self.messages.lock().unwrap().push(*message);
        Ok(())
    }
}

fn test_scheduler(sink: RecordingSink) -> NoteScheduler<RecordingSink> {
    let config = SonifierConfig {
        default_duration_ms: 20,
        default_velocity: 100,
        max_pending: 64,
        poll_interval_ms: 5,
    };
    let (notification_tx, _notification_rx) = create_notification_channel(64);
    NoteScheduler::new(
        &config,
        NoteMapper::chromatic(0, 120).unwrap(),
        sink,
        notification_tx,
    )
    .unwrap()
}

#[test]
fn test_dispatch_latency() {
    const ITERATIONS: u32 = 100;

    let scheduler = test_scheduler(RecordingSink::new());

    // Warmup: first dispatch pays for lazy allocations
    scheduler.dispatch(&SpikeEvent::new(0)).unwrap();

    let start = Instant::now();
    for i in 0..ITERATIONS {
        scheduler.dispatch(&SpikeEvent::new(i % 120)).unwrap();
    }
    let average = start.elapsed() / ITERATIONS;

    println!("Dispatch time (avg over {ITERATIONS}): {average:?}");

    // Dispatch must stay well under 100µs to keep notification threads live
    assert!(
        average.as_micros() < 100,
        "dispatch too slow: {average:?} average"
    );

    scheduler.stop();
}

#[test]
fn test_silence_latency() {
    const ITERATIONS: u32 = 100;

    let scheduler = test_scheduler(RecordingSink::new());

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        scheduler.silence().unwrap();
    }
    let average = start.elapsed() / ITERATIONS;

    println!("Silence time (avg over {ITERATIONS}): {average:?}");
    assert!(
        average.as_micros() < 200,
        "silence too slow: {average:?} average"
    );

    scheduler.stop();
}

/// End-to-end latency from dispatch to the note-on reaching the sink is
/// bounded by the poll interval plus scheduling noise.
#[test]
fn test_note_on_latency_bounded() {
    let sink = RecordingSink::new();
    let handle = sink.clone();
    let scheduler = test_scheduler(sink);

    let start = Instant::now();
    scheduler.dispatch(&SpikeEvent::new(60)).unwrap();

    // Poll until the note-on lands
    while handle.count() == 0 {
        assert!(
            start.elapsed() < Duration::from_millis(100),
            "note-on did not reach the sink within 100ms"
        );
        std::thread::sleep(Duration::from_millis(1));
    }

    let latency = start.elapsed();
    println!("Dispatch to note-on latency: {latency:?}");

    scheduler.stop();
}
