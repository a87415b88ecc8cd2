use neuromidi::messaging::drain;
use neuromidi::{
    MidirSink, NoteMapper, NoteScheduler, ReplaySource, SonifierConfig, SpikeId, SpikeRateMonitor,
    create_notification_channel, poisson_spike_train,
};
use std::time::Duration;

// Sized for worst-case send-failure bursts: one notification per failed
// command, drained once at the end of the demo.
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 256;

// Demo spike train parameters
const DEMO_SOURCES: u8 = 16;
const DEMO_BASE_NOTE: u8 = 48; // C3
const DEMO_RATE_HZ: f64 = 25.0;
const DEMO_SECONDS: u64 = 10;

fn main() {
    println!("=== NeuroMIDI ===");
    println!("Spike-to-MIDI sonification demo\n");

    // Config : fichier JSON optionnel en argument
    let config = match std::env::args().nth(1) {
        Some(path) => match SonifierConfig::from_json_file(&path) {
            Ok(config) => {
                println!("Config loaded from {path}");
                config
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                return;
            }
        },
        None => SonifierConfig::default(),
    };

    let mapper = match NoteMapper::chromatic(DEMO_BASE_NOTE, DEMO_SOURCES) {
        Ok(mapper) => mapper,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return;
        }
    };

    println!("MIDI initialisation...");
    let sink = match MidirSink::open("NeuroMIDI") {
        Ok(sink) => {
            println!("✓ MIDI connected: {}", sink.port_name());
            sink
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            return;
        }
    };

    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);

    let scheduler = match NoteScheduler::new(&config, mapper, sink, notification_tx) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return;
        }
    };

    // Random spike train over the mapped sources
    let sources: Vec<SpikeId> = (0..DEMO_SOURCES as SpikeId).collect();
    let train = poisson_spike_train(
        DEMO_RATE_HZ,
        Duration::from_secs(DEMO_SECONDS),
        &sources,
    );
    println!("Streaming {} spikes over {DEMO_SECONDS}s...\n", train.len());

    let rate = SpikeRateMonitor::new(Duration::from_secs(1));
    let mut source = ReplaySource::new(train);
    source.attach(Box::new(rate.clone()));
    source.attach(Box::new(scheduler.dispatcher()));

    let failures = source.stream();
    println!(
        "Stream done: {} listener failures, {} spikes/s at the end",
        failures,
        rate.rate()
    );

    // Let the tail of scheduled note-offs play out
    std::thread::sleep(config.default_duration() + config.poll_interval());

    for notification in drain(&mut notification_rx) {
        eprintln!(
            "[{:?}/{:?}] {}",
            notification.level, notification.category, notification.message
        );
    }

    if let Err(e) = scheduler.silence() {
        eprintln!("Silence failed: {e}");
    }

    match scheduler.stop() {
        Some(sink) => {
            sink.close();
            println!("\n=== NeuroMIDI stopped ===");
        }
        None => eprintln!("WARNING: sink still shared at shutdown"),
    }
}
