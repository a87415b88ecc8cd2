// Pending store - bounded, insertion-ordered note requests
//
// Latest request wins per note; FIFO eviction when over capacity.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A note waiting for its note-on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRequest {
    pub duration: Duration,
    pub velocity: u8,
}

/// Capacity-bounded map from note number to its most recent pending
/// request, ordered by first insertion for eviction.
#[derive(Debug)]
pub struct PendingStore {
    entries: HashMap<u8, NoteRequest>,
    order: VecDeque<u8>,
    capacity: usize,
}

impl PendingStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert or replace the request for `note`.
    ///
    /// A replaced entry keeps its original position in the eviction order.
    /// Returns the evicted oldest entry when the store ran over capacity.
    pub fn upsert(&mut self, note: u8, request: NoteRequest) -> Option<(u8, NoteRequest)> {
        if self.entries.insert(note, request).is_none() {
            self.order.push_back(note);
        }
        if self.entries.len() <= self.capacity {
            return None;
        }
        // Over capacity by exactly one. The front cannot be the note just
        // inserted: capacity >= 1 means there are at least two entries.
        let oldest = self.order.pop_front()?;
        let evicted = self.entries.remove(&oldest)?;
        Some((oldest, evicted))
    }

    /// Remove and return the pending request for `note`
    pub fn take(&mut self, note: u8) -> Option<NoteRequest> {
        let request = self.entries.remove(&note)?;
        self.order.retain(|n| *n != note);
        Some(request)
    }

    pub fn contains(&self, note: u8) -> bool {
        self.entries.contains_key(&note)
    }

    /// Note that would be evicted next
    pub fn oldest(&self) -> Option<u8> {
        self.order.front().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(velocity: u8) -> NoteRequest {
        NoteRequest {
            duration: Duration::from_millis(100),
            velocity,
        }
    }

    #[test]
    fn test_upsert_and_take() {
        let mut store = PendingStore::new(4);
        assert!(store.is_empty());

        assert!(store.upsert(60, request(100)).is_none());
        assert_eq!(store.len(), 1);
        assert!(store.contains(60));

        assert_eq!(store.take(60), Some(request(100)));
        assert!(store.is_empty());
        assert_eq!(store.take(60), None);
    }

    #[test]
    fn test_latest_request_wins() {
        let mut store = PendingStore::new(4);
        store.upsert(60, request(100));
        store.upsert(60, request(80));

        // Une seule entrée, la plus récente
        assert_eq!(store.len(), 1);
        assert_eq!(store.take(60), Some(request(80)));
    }

    #[test]
    fn test_replace_keeps_eviction_position() {
        let mut store = PendingStore::new(2);
        store.upsert(10, request(1));
        store.upsert(20, request(2));
        // Replacing 10 does not make it the newest entry
        store.upsert(10, request(3));

        let evicted = store.upsert(30, request(4));
        assert_eq!(evicted, Some((10, request(3))));
    }

    #[test]
    fn test_fifo_eviction() {
        let mut store = PendingStore::new(2);
        assert!(store.upsert(10, request(1)).is_none());
        assert!(store.upsert(20, request(2)).is_none());

        let evicted = store.upsert(30, request(3));
        assert_eq!(evicted, Some((10, request(1))));
        assert_eq!(store.len(), 2);
        assert!(!store.contains(10));
        assert!(store.contains(20));
        assert!(store.contains(30));
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut store = PendingStore::new(3);
        for note in 0..50 {
            store.upsert(note, request(note));
            assert!(store.len() <= store.capacity());
        }
    }

    #[test]
    fn test_take_removes_from_eviction_order() {
        let mut store = PendingStore::new(2);
        store.upsert(10, request(1));
        store.upsert(20, request(2));
        assert_eq!(store.oldest(), Some(10));

        store.take(10);
        assert_eq!(store.oldest(), Some(20));

        // 10 re-inserted after its removal is now the newest entry
        store.upsert(10, request(3));
        let evicted = store.upsert(30, request(4));
        assert_eq!(evicted, Some((20, request(2))));
    }

    #[test]
    fn test_capacity_one() {
        let mut store = PendingStore::new(1);
        assert!(store.upsert(10, request(1)).is_none());
        assert_eq!(store.upsert(20, request(2)), Some((10, request(1))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.take(20), Some(request(2)));
    }
}
