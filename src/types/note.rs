use tracing::warn;

use super::frequency::{frequency_for, in_safe_band, note_name};

/// Seconds per MIDI tick
/// Derived once from the first tempo event; tempo changes are not followed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoRatio(f64);

impl TempoRatio {
    /// microseconds-per-quarter / ticks-per-quarter / 1e6
    pub fn from_tempo(micros_per_quarter: u32, ticks_per_quarter: u16) -> Self {
        Self(micros_per_quarter as f64 / ticks_per_quarter as f64 / 1_000_000.0)
    }

    pub fn seconds_per_tick(&self) -> f64 {
        self.0
    }

    /// Convert an absolute tick position to seconds
    pub fn seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.0
    }
}

/// One paired note-on/note-off as produced by a score reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawNote {
    pub track: usize,
    pub note: u8,
    pub start_tick: u64,
    pub end_tick: u64,
}

/// A note ready to be played as a haptic pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub note: u8,
    /// Onset in seconds from the start of playback
    pub start_time: f64,
    /// Length in seconds (never negative)
    pub duration: f64,
    /// Frequency in Hz from the lookup table
    pub frequency: f32,
}

impl NoteEvent {
    /// Build a note from a raw record
    /// Returns None (and logs) when the note number is past the frequency table
    pub fn from_raw(raw: &RawNote, ratio: TempoRatio) -> Option<Self> {
        let Some(frequency) = frequency_for(raw.note) else {
            warn!(track = raw.track, note = raw.note, "note is too high to play, dropped");
            return None;
        };

        if !in_safe_band(frequency) {
            warn!(
                track = raw.track,
                note = %note_name(raw.note),
                frequency,
                "note frequency outside the motor's safe band, may be distorted"
            );
        }

        let length = raw.end_tick.saturating_sub(raw.start_tick);

        Some(Self {
            note: raw.note,
            start_time: ratio.seconds(raw.start_tick),
            duration: ratio.seconds(length),
            frequency,
        })
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_capture::capture;

    fn raw(note: u8, start_tick: u64, end_tick: u64) -> RawNote {
        RawNote { track: 1, note, start_tick, end_tick }
    }

    #[test]
    fn test_tempo_ratio_120_bpm() {
        let ratio = TempoRatio::from_tempo(500_000, 480);
        assert!((ratio.seconds(480) - 0.5).abs() < 1e-9);
        assert!((ratio.seconds(960) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_raw_converts_ticks() {
        let ratio = TempoRatio::from_tempo(1_000_000, 480);
        let note = NoteEvent::from_raw(&raw(69, 480, 960), ratio).unwrap();

        assert!((note.start_time - 1.0).abs() < 1e-9);
        assert!((note.duration - 1.0).abs() < 1e-9);
        assert!((note.end_time() - 2.0).abs() < 1e-9);
        assert!((note.frequency - 440.0).abs() < 0.001);
        assert_eq!(note.note, 69);
    }

    #[test]
    fn test_note_too_high_is_rejected() {
        let ratio = TempoRatio::from_tempo(500_000, 480);

        let (note, log) = capture(|| NoteEvent::from_raw(&raw(128, 0, 10), ratio));
        assert!(note.is_none());
        assert_eq!(log.count("too high"), 1);
        assert!(log.contains("note=128"));

        let (note, log) = capture(|| NoteEvent::from_raw(&raw(127, 0, 10), ratio));
        assert!(note.is_some());
        assert!(!log.contains("too high"));
    }

    #[test]
    fn test_out_of_band_note_is_kept() {
        // C1 is far below the safe band but still plays
        let ratio = TempoRatio::from_tempo(500_000, 480);
        let (note, log) = capture(|| NoteEvent::from_raw(&raw(24, 0, 480), ratio));
        assert!(note.unwrap().frequency < 40.0);
        assert_eq!(log.count("safe band"), 1);
        assert!(log.contains("note=C1"));
    }

    #[test]
    fn test_in_band_note_is_quiet() {
        let ratio = TempoRatio::from_tempo(500_000, 480);
        let (note, log) = capture(|| NoteEvent::from_raw(&raw(69, 0, 480), ratio));
        assert!(note.is_some());
        assert!(log.contents().is_empty());
    }

    #[test]
    fn test_reversed_ticks_give_zero_duration() {
        let ratio = TempoRatio::from_tempo(500_000, 480);
        let note = NoteEvent::from_raw(&raw(60, 960, 480), ratio).unwrap();
        assert_eq!(note.duration, 0.0);
    }
}
