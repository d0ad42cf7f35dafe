use std::path::Path;

use super::error::SetupError;
use crate::types::note::{RawNote, TempoRatio};

/// A tempo meta-event at an absolute tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoMark {
    pub track: usize,
    pub tick: u64,
    pub micros_per_quarter: u32,
}

/// Flat, parser-neutral view of a MIDI file
/// Everything playback needs and nothing else
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    pub ticks_per_quarter: u16,
    pub track_count: usize,
    /// Tempo events in file order
    pub tempos: Vec<TempoMark>,
    /// Paired notes in note-on order within each track
    pub notes: Vec<RawNote>,
}

impl Score {
    /// Seconds-per-tick from the first tempo event on `track`
    pub fn tempo_ratio(&self, track: usize) -> Result<TempoRatio, SetupError> {
        self.check_track(track)?;
        let tempo = self
            .tempos
            .iter()
            .find(|mark| mark.track == track)
            .ok_or(SetupError::MissingTempo { track })?;

        Ok(TempoRatio::from_tempo(
            tempo.micros_per_quarter,
            self.ticks_per_quarter,
        ))
    }

    /// Notes belonging to a single track
    pub fn track_notes(&self, track: usize) -> impl Iterator<Item = &RawNote> {
        self.notes.iter().filter(move |note| note.track == track)
    }

    /// Error unless `track` exists in the file
    pub fn check_track(&self, track: usize) -> Result<(), SetupError> {
        if track < self.track_count {
            Ok(())
        } else {
            Err(SetupError::TrackOutOfRange {
                track,
                track_count: self.track_count,
            })
        }
    }
}

/// Source of scores; the playback core never parses binary MIDI itself
pub trait ScoreReader {
    fn read(&self, path: &Path) -> Result<Score, SetupError>;
}
