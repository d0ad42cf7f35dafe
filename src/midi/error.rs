use std::path::PathBuf;
use thiserror::Error;

/// Reasons a MIDI file cannot drive playback at all
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("{} does not exist or access denied", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse MIDI data: {0}")]
    Parse(#[from] midly::Error),

    #[error("SMPTE timecode timing is not supported, only ticks per quarter note")]
    UnsupportedTiming,

    #[error("No tempo event on track {track}, cannot determine note timing")]
    MissingTempo { track: usize },

    #[error("Track {track} does not exist (file has {track_count} tracks)")]
    TrackOutOfRange { track: usize, track_count: usize },
}
