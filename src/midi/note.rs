//! MIDI note events recovered from a parsed track.
//!
//! Unlike an editable sequencer's note model, this one is write-once: the
//! parser appends notes as it closes them and nothing downstream mutates a
//! `Note` again.

/// A single Note-On/Note-Off pair on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// MIDI channel (0-15) the note was played on.
    pub channel: u8,
    /// MIDI note number (0-127).
    pub pitch: u8,
    /// Tick at which the Note-On occurred.
    pub on_tick: u32,
    /// Tick at which the matching Note-Off occurred.
    ///
    /// Always `>= on_tick`; equal when the note is audible for a single
    /// tick.
    pub off_tick: u32,
}

impl Note {
    pub fn new(channel: u8, pitch: u8, on_tick: u32, off_tick: u32) -> Self {
        debug_assert!(off_tick >= on_tick);
        Self {
            channel,
            pitch,
            on_tick,
            off_tick,
        }
    }

    /// Tick duration of the note.
    pub fn duration_ticks(&self) -> u32 {
        self.off_tick - self.on_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_off_minus_on() {
        let n = Note::new(0, 60, 100, 340);
        assert_eq!(n.duration_ticks(), 240);
    }

    #[test]
    fn zero_length_note_is_valid() {
        let n = Note::new(0, 60, 100, 100);
        assert_eq!(n.duration_ticks(), 0);
    }
}
