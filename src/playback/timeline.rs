use tracing::warn;

use crate::types::frequency::note_name;
use crate::types::note::{NoteEvent, RawNote, TempoRatio};

/// Result of a tick that reached at least one due note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// The last due note, the only one actually played
    pub note: NoteEvent,
    /// Due notes passed over in the same tick
    pub skipped: usize,
}

/// Time-sorted notes of one track plus a playback cursor
/// The cursor only moves forward: each note is evaluated at most once
#[derive(Debug, Clone)]
pub struct TrackTimeline {
    track: usize,
    notes: Vec<NoteEvent>,
    cursor: usize,
}

impl TrackTimeline {
    /// Build a timeline from raw notes, dropping any that cannot be played
    pub fn build<'a>(
        track: usize,
        raw_notes: impl IntoIterator<Item = &'a RawNote>,
        ratio: TempoRatio,
    ) -> Self {
        let notes = raw_notes
            .into_iter()
            .filter_map(|raw| NoteEvent::from_raw(raw, ratio))
            .collect();
        Self::from_notes(track, notes)
    }

    /// Wrap already-built notes; sorting is stable so equal onsets keep their order
    pub fn from_notes(track: usize, mut notes: Vec<NoteEvent>) -> Self {
        notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        Self {
            track,
            notes,
            cursor: 0,
        }
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    /// Index of the next unconsumed note
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.notes.len()
    }

    /// Consume every note that has started by `time`
    ///
    /// Only the last due note is returned for playing; the haptic channel is
    /// monophonic, so earlier due notes in the same tick are skipped with a warning.
    pub fn advance(&mut self, time: f64) -> Option<Advance> {
        let first = *self.notes.get(self.cursor)?;
        if first.start_time > time {
            return None;
        }

        let mut note = first;
        let mut skipped = 0;
        self.cursor += 1;

        while let Some(next) = self.notes.get(self.cursor) {
            if next.start_time > time {
                break;
            }
            warn!(
                track = self.track,
                note = %note_name(note.note),
                start_time = note.start_time,
                "note skipped"
            );
            note = *next;
            skipped += 1;
            self.cursor += 1;
        }

        Some(Advance { note, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_capture::capture;

    fn note_at(note: u8, start_time: f64) -> NoteEvent {
        NoteEvent {
            note,
            start_time,
            duration: 0.25,
            frequency: crate::types::frequency::FREQUENCY_TABLE[note as usize],
        }
    }

    fn timeline(starts: &[(u8, f64)]) -> TrackTimeline {
        TrackTimeline::from_notes(1, starts.iter().map(|&(n, t)| note_at(n, t)).collect())
    }

    #[test]
    fn test_catch_up_plays_last_due_note() {
        let mut tl = timeline(&[(60, 0.0), (62, 0.5), (64, 0.5), (65, 1.2)]);

        let (advance, log) = capture(|| tl.advance(0.6).unwrap());

        assert_eq!(tl.cursor(), 3);
        assert_eq!(advance.note.note, 64);
        assert_eq!(advance.skipped, 2);
        assert_eq!(log.count("note skipped"), 2);
    }

    #[test]
    fn test_catch_up_from_first_due_note() {
        let mut tl = timeline(&[(60, 0.0), (62, 0.5), (64, 0.5), (65, 1.2)]);

        let (first, log) = capture(|| tl.advance(0.0).unwrap());
        assert_eq!(first.note.note, 60);
        assert_eq!(tl.cursor(), 1);
        assert_eq!(log.count("note skipped"), 0);

        let (advance, log) = capture(|| tl.advance(0.6).unwrap());
        assert_eq!(tl.cursor(), 3);
        assert_eq!(advance.note.note, 64);
        assert_eq!(advance.skipped, 1);
        assert_eq!(log.count("note skipped"), 1);
        assert!(log.contains("note=D4"));
    }

    #[test]
    fn test_equal_start_times_last_in_source_order_wins() {
        let mut tl = timeline(&[(70, 1.0), (50, 1.0), (80, 1.0)]);

        let advance = tl.advance(1.0).unwrap();
        assert_eq!(advance.note.note, 80);
        assert_eq!(advance.skipped, 2);
        assert!(tl.is_finished());
    }

    #[test]
    fn test_not_yet_due() {
        let mut tl = timeline(&[(60, 1.0)]);
        assert!(tl.advance(0.999).is_none());
        assert_eq!(tl.cursor(), 0);
        assert!(tl.advance(1.0).is_some());
    }

    #[test]
    fn test_no_replay_for_repeated_or_earlier_time() {
        let mut tl = timeline(&[(60, 0.5), (62, 2.0)]);

        assert!(tl.advance(0.5).is_some());
        assert!(tl.advance(0.5).is_none());
        assert!(tl.advance(0.1).is_none());
        assert!(tl.advance(1.9).is_none());
        assert_eq!(tl.cursor(), 1);
    }

    #[test]
    fn test_finished_is_terminal() {
        let mut tl = timeline(&[(60, 0.0)]);
        assert!(tl.advance(0.0).is_some());
        assert!(tl.is_finished());

        for time in [0.0, 10.0, 1e9, -1.0] {
            assert!(tl.advance(time).is_none());
            assert_eq!(tl.cursor(), 1);
        }
    }

    #[test]
    fn test_empty_timeline_is_finished() {
        let mut tl = timeline(&[]);
        assert!(tl.is_empty());
        assert!(tl.is_finished());
        assert!(tl.advance(100.0).is_none());
    }

    #[test]
    fn test_unsorted_input_is_sorted_stably() {
        let tl = timeline(&[(72, 2.0), (60, 0.0), (64, 1.0), (65, 1.0)]);
        let order: Vec<u8> = tl.notes().iter().map(|n| n.note).collect();
        assert_eq!(order, vec![60, 64, 65, 72]);
    }

    #[test]
    fn test_build_drops_notes_past_table() {
        let ratio = TempoRatio::from_tempo(500_000, 480);
        let raw = [
            RawNote { track: 2, note: 60, start_tick: 0, end_tick: 480 },
            RawNote { track: 2, note: 128, start_tick: 480, end_tick: 960 },
            RawNote { track: 2, note: 200, start_tick: 960, end_tick: 1440 },
            RawNote { track: 2, note: 127, start_tick: 1440, end_tick: 1920 },
        ];

        let (tl, log) = capture(|| TrackTimeline::build(2, &raw, ratio));

        assert_eq!(tl.len(), 2);
        assert_eq!(log.count("too high"), 2);
        assert!(tl.notes().iter().all(|n| n.note <= 127));
        assert_eq!(tl.track(), 2);
    }
}
