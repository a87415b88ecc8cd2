// MIDI event types and 3-byte wire encoding

/// Controller number of the All Notes Off channel-mode message
const ALL_NOTES_OFF_CONTROLLER: u8 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
}

impl MidiEvent {
    /// Encode as a raw 3-byte MIDI message
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiEvent::NoteOn { note, velocity } => [0x90, note, velocity],
            MidiEvent::NoteOff { note } => [0x80, note, 0],
            MidiEvent::AllNotesOff => [0xB0, ALL_NOTES_OFF_CONTROLLER, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_encoding() {
        // Note On, note 60 (C4), velocity 100
        let event = MidiEvent::NoteOn {
            note: 60,
            velocity: 100,
        };
        assert_eq!(event.to_bytes(), [0x90, 60, 100]);
    }

    #[test]
    fn test_note_off_encoding() {
        // Note Off always carries velocity 0
        let event = MidiEvent::NoteOff { note: 60 };
        assert_eq!(event.to_bytes(), [0x80, 60, 0]);
    }

    #[test]
    fn test_all_notes_off_encoding() {
        // CC 123 silences every sounding note at once
        let event = MidiEvent::AllNotesOff;
        assert_eq!(event.to_bytes(), [0xB0, 123, 0]);
    }

    #[test]
    fn test_note_range_encoding() {
        // Tester différentes notes MIDI valides
        for note in [0, 60, 127] {
            let event = MidiEvent::NoteOn {
                note,
                velocity: 100,
            };
            assert_eq!(event.to_bytes()[1], note);
        }
    }
}
