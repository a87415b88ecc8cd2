// Identity mapper - spike source to MIDI note lookup

use crate::spike::{SpikeError, SpikeId, SpikeResult};
use std::collections::HashMap;

/// Highest addressable MIDI note
pub const MAX_NOTE: u8 = 127;

/// Pure lookup from spike source identity to MIDI note number.
///
/// Deterministic and side-effect-free. A mapping miss is an explicit
/// error, never a silent fallback or a clamp.
#[derive(Debug, Clone)]
pub struct NoteMapper {
    table: HashMap<SpikeId, u8>,
}

impl NoteMapper {
    /// Build from an explicit source -> note table.
    ///
    /// Out-of-range notes are rejected here so `map` never has to clamp.
    pub fn from_table(table: HashMap<SpikeId, u8>) -> SpikeResult<Self> {
        for (&source, &note) in &table {
            if note > MAX_NOTE {
                return Err(SpikeError::NoteOutOfRange { source, note });
            }
        }
        Ok(Self { table })
    }

    /// Chromatic layout: source `k` maps to `base + k` for the first
    /// `count` sources.
    pub fn chromatic(base: u8, count: u8) -> SpikeResult<Self> {
        let mut table = HashMap::with_capacity(count as usize);
        for k in 0..count {
            let note = base.saturating_add(k);
            if note > MAX_NOTE {
                return Err(SpikeError::NoteOutOfRange {
                    source: k as SpikeId,
                    note,
                });
            }
            table.insert(k as SpikeId, note);
        }
        Ok(Self { table })
    }

    /// Resolve a spike source to its MIDI note
    pub fn map(&self, source: SpikeId) -> SpikeResult<u8> {
        self.table
            .get(&source)
            .copied()
            .ok_or(SpikeError::UnmappedSpike(source))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
