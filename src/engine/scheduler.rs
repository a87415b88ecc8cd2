// Note scheduler - dispatch path, worker thread and deadline releases
//
// The dispatch path runs on the notifying threads and never blocks.
// The worker thread is the single owner of the deadline heap and, apart
// from the all-notes-off path, the only context touching the sink.

use crate::engine::config::{ConfigError, SonifierConfig};
use crate::engine::pending::{NoteRequest, PendingStore};
use crate::messaging::{Notification, NotificationCategory, NotificationProducer};
use crate::midi::event::MidiEvent;
use crate::midi::output::{MidiSink, SinkError};
use crate::spike::{NoteMapper, SpikeError, SpikeEvent, SpikeListener};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};
use ringbuf::traits::Producer;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Maximum velocity the wire format can carry
const MAX_VELOCITY: u8 = 127;

/// Messages crossing the producer -> worker boundary
#[derive(Debug, Clone, Copy)]
enum WorkerMessage {
    /// A note may have a pending request to fire
    Note(u8),
    /// Cooperative stop; the worker finishes its current iteration and exits
    Shutdown,
}

/// A sounding note waiting for its note-off.
// Field order matters: the derived Ord compares deadlines first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct NoteRelease {
    deadline: Instant,
    note: u8,
}

/// Dispatch-path handle: maps a spike, stores the request, queues a marker.
///
/// Cheap to clone; every clone feeds the same scheduler. Attachable to a
/// [`crate::spike::SpikeNotifier`] as a listener.
#[derive(Clone)]
pub struct SpikeDispatcher {
    mapper: Arc<NoteMapper>,
    pending: Arc<Mutex<PendingStore>>,
    markers: Sender<WorkerMessage>,
    default_duration: Duration,
    default_velocity: u8,
}

impl SpikeDispatcher {
    /// Resolve, store and enqueue one spike. O(1), non-blocking, no I/O.
    pub fn dispatch(&self, event: &SpikeEvent) -> Result<(), SpikeError> {
        let note = self.mapper.map(event.source)?;
        let request = NoteRequest {
            duration: event.duration.unwrap_or(self.default_duration),
            velocity: event
                .velocity
                .unwrap_or(self.default_velocity)
                .min(MAX_VELOCITY),
        };

        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            // Latest request wins; overflow silently drops the oldest entry.
            pending.upsert(note, request);
        }

        self.markers
            .send(WorkerMessage::Note(note))
            .map_err(|_| SpikeError::SchedulerStopped)
    }
}

impl SpikeListener for SpikeDispatcher {
    fn on_spike(&self, event: &SpikeEvent) -> Result<(), SpikeError> {
        self.dispatch(event)
    }
}

/// Converts dispatched spikes into timed note-on/note-off commands.
///
/// One worker thread is started at construction and runs until [`stop`]
/// or until every dispatcher handle has been dropped.
///
/// [`stop`]: NoteScheduler::stop
pub struct NoteScheduler<S: MidiSink + 'static> {
    dispatcher: SpikeDispatcher,
    sink: Arc<Mutex<S>>,
    send_failures: Arc<AtomicU64>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<S: MidiSink + 'static> NoteScheduler<S> {
    /// Validate the configuration and start the worker thread
    pub fn new(
        config: &SonifierConfig,
        mapper: NoteMapper,
        sink: S,
        notifications: NotificationProducer,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (marker_tx, marker_rx) = unbounded();
        let pending = Arc::new(Mutex::new(PendingStore::new(config.max_pending)));
        let sink = Arc::new(Mutex::new(sink));
        let send_failures = Arc::new(AtomicU64::new(0));

        let worker = {
            let mut worker = Worker {
                markers: marker_rx,
                pending: pending.clone(),
                sink: sink.clone(),
                notifications,
                send_failures: send_failures.clone(),
                heap: BinaryHeap::new(),
                poll_interval: config.poll_interval(),
            };
            thread::spawn(move || worker.run())
        };

        Ok(Self {
            dispatcher: SpikeDispatcher {
                mapper: Arc::new(mapper),
                pending,
                markers: marker_tx,
                default_duration: config.default_duration(),
                default_velocity: config.default_velocity,
            },
            sink,
            send_failures,
            worker: Some(worker),
        })
    }

    /// Dispatch one spike on the calling thread
    pub fn dispatch(&self, event: &SpikeEvent) -> Result<(), SpikeError> {
        self.dispatcher.dispatch(event)
    }

    /// Clonable dispatch handle, e.g. for attaching to a notifier
    pub fn dispatcher(&self) -> SpikeDispatcher {
        self.dispatcher.clone()
    }

    /// Immediate all-notes-off, independent of queue and heap state.
    ///
    /// Scheduled releases are not cancelled; silenced notes receive a
    /// harmless redundant note-off when their deadline elapses.
    pub fn silence(&self) -> Result<(), SinkError> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.send_event(MidiEvent::AllNotesOff)
    }

    /// Requests currently waiting for their note-on
    pub fn pending_len(&self) -> usize {
        self.dispatcher
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Note-on/note-off sends that have failed so far
    pub fn send_failures(&self) -> u64 {
        self.send_failures.load(Ordering::Relaxed)
    }

    /// Stop the worker and hand the sink back.
    ///
    /// Joins the worker before returning, so no command can be sent once
    /// this returns and closing the sink is safe. Returns `None` only if
    /// the sink is unexpectedly still shared.
    pub fn stop(mut self) -> Option<S> {
        let _ = self.dispatcher.markers.send(WorkerMessage::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let Self {
            dispatcher, sink, ..
        } = self;
        drop(dispatcher);
        Arc::try_unwrap(sink)
            .ok()
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Worker-side state. Exclusive owner of the deadline heap: no locking is
/// needed for heap access once markers have crossed the channel boundary.
struct Worker<S: MidiSink> {
    markers: Receiver<WorkerMessage>,
    pending: Arc<Mutex<PendingStore>>,
    sink: Arc<Mutex<S>>,
    notifications: NotificationProducer,
    send_failures: Arc<AtomicU64>,
    heap: BinaryHeap<Reverse<NoteRelease>>,
    poll_interval: Duration,
}

impl<S: MidiSink> Worker<S> {
    fn run(&mut self) {
        loop {
            // Draining: consume queued markers without blocking
            loop {
                match self.markers.try_recv() {
                    Ok(WorkerMessage::Note(note)) => self.fire_note_on(note),
                    Ok(WorkerMessage::Shutdown) | Err(TryRecvError::Disconnected) => {
                        self.release_due();
                        return;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }

            // Releasing: emit note-offs whose deadline has elapsed
            self.release_due();

            // Idle wait: bounded, interruptible by markers and shutdown
            let timeout = match self.heap.peek() {
                Some(&Reverse(release)) => release
                    .deadline
                    .saturating_duration_since(Instant::now())
                    .min(self.poll_interval),
                None => self.poll_interval,
            };
            match self.markers.recv_timeout(timeout) {
                Ok(WorkerMessage::Note(note)) => self.fire_note_on(note),
                Ok(WorkerMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                    self.release_due();
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    /// Marker handler. A marker whose note has no pending entry is a no-op;
    /// that is what collapses duplicate markers and finalises evictions.
    fn fire_note_on(&mut self, note: u8) {
        let request = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            pending.take(note)
        };
        let Some(request) = request else { return };

        if self.send(MidiEvent::NoteOn {
            note,
            velocity: request.velocity,
        }) {
            // The release exists only once the note actually sounded
            self.heap.push(Reverse(NoteRelease {
                deadline: Instant::now() + request.duration,
                note,
            }));
        }
    }

    fn release_due(&mut self) {
        let now = Instant::now();
        while let Some(&Reverse(release)) = self.heap.peek() {
            if release.deadline > now {
                break;
            }
            self.heap.pop();
            self.send(MidiEvent::NoteOff { note: release.note });
        }
    }

    /// Send one command; failures are counted and reported, never fatal
    fn send(&mut self, event: MidiEvent) -> bool {
        let result = {
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            sink.send_event(event)
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                self.send_failures.fetch_add(1, Ordering::Relaxed);
                let _ = self.notifications.try_push(Notification::error(
                    NotificationCategory::Midi,
                    format!("MIDI send failed: {e}"),
                ));
                false
            }
        }
    }
}
