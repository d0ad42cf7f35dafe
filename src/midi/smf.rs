use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use tracing::{info, warn};

use super::error::SetupError;
use super::score::{Score, ScoreReader, TempoMark};
use crate::types::frequency::note_name;
use crate::types::note::RawNote;

/// Standard MIDI File reader backed by midly
#[derive(Debug, Clone, Copy, Default)]
pub struct SmfReader;

impl SmfReader {
    /// Parse an in-memory Standard MIDI File
    pub fn parse(bytes: &[u8]) -> Result<Score, SetupError> {
        let smf = Smf::parse(bytes)?;

        let ticks_per_quarter = match smf.header.timing {
            Timing::Metrical(tpq) if tpq.as_int() > 0 => tpq.as_int(),
            _ => return Err(SetupError::UnsupportedTiming),
        };

        let mut score = Score {
            ticks_per_quarter,
            track_count: smf.tracks.len(),
            ..Score::default()
        };

        for (index, track) in smf.tracks.iter().enumerate() {
            collect_track(index, track, &mut score);
        }

        info!(
            tracks = score.track_count,
            ticks_per_quarter,
            notes = score.notes.len(),
            "MIDI file parsed"
        );
        Ok(score)
    }
}

impl ScoreReader for SmfReader {
    fn read(&self, path: &Path) -> Result<Score, SetupError> {
        if !path.is_file() {
            return Err(SetupError::FileNotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|source| SetupError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&bytes)
    }
}

/// Pair note-ons with note-offs for one track
/// Same (channel, key) pairs first-in first-out; note-on with velocity 0 is a note-off
fn collect_track(index: usize, events: &[TrackEvent<'_>], score: &mut Score) {
    let mut tick = 0u64;
    let mut notes: Vec<RawNote> = Vec::new();
    let mut open: HashMap<(u8, u8), VecDeque<usize>> = HashMap::new();

    for event in events {
        tick += event.delta.as_int() as u64;

        match event.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(micros)) => {
                score.tempos.push(TempoMark {
                    track: index,
                    tick,
                    micros_per_quarter: micros.as_int(),
                });
            }
            TrackEventKind::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        open.entry((channel, key.as_int()))
                            .or_default()
                            .push_back(notes.len());
                        notes.push(RawNote {
                            track: index,
                            note: key.as_int(),
                            start_tick: tick,
                            end_tick: tick,
                        });
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        let slot = open
                            .get_mut(&(channel, key.as_int()))
                            .and_then(|queue| queue.pop_front());
                        if let Some(slot) = slot {
                            notes[slot].end_tick = tick;
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    // Anything still sounding is closed at the end of the track
    for slot in open.into_values().flatten() {
        let note = &mut notes[slot];
        warn!(
            track = index,
            note = %note_name(note.note),
            start_tick = note.start_tick,
            "note-on without note-off, closed at end of track"
        );
        note.end_tick = tick;
    }

    score.notes.extend(notes);
}
