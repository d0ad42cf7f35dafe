use std::path::PathBuf;

use tracing::{error, info, warn};

use super::timeline::TrackTimeline;
use crate::haptics::HapticActuator;
use crate::midi::{Score, ScoreReader, SetupError};
use crate::types::note::TempoRatio;
use crate::types::pulse::{Hand, HapticPulse};

/// Track and strength for one controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideSettings {
    pub track: usize,
    /// Normalized vibration strength (0.0 to 1.0)
    pub amplitude: f32,
}

/// Everything needed to turn a MIDI file into a driver
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSettings {
    pub path: PathBuf,
    pub tempo_track: usize,
    /// None disables the left hand
    pub left: Option<SideSettings>,
    /// None disables the right hand
    pub right: Option<SideSettings>,
}

/// A timeline bound to a controller
#[derive(Debug, Clone)]
pub struct HandTimeline {
    pub hand: Hand,
    pub amplitude: f32,
    pub timeline: TrackTimeline,
    /// Notes dropped by catch-up so far
    pub skipped: usize,
    pub last_pulse: Option<HapticPulse>,
}

impl HandTimeline {
    fn new(hand: Hand, amplitude: f32, timeline: TrackTimeline) -> Self {
        Self {
            hand,
            amplitude: amplitude.clamp(0.0, 1.0),
            timeline,
            skipped: 0,
            last_pulse: None,
        }
    }

    fn advance<A: HapticActuator + ?Sized>(&mut self, time: f64, actuator: &mut A) -> Option<usize> {
        let advance = self.timeline.advance(time)?;
        let pulse = HapticPulse::new(
            self.hand,
            advance.note.duration as f32,
            advance.note.frequency,
            self.amplitude,
        );
        actuator.execute(&pulse);

        self.skipped += advance.skipped;
        self.last_pulse = Some(pulse);
        Some(advance.skipped)
    }
}

/// What one call to `advance` did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tick {
    pub pulses: usize,
    pub skipped: usize,
}

/// Plays up to two timelines, one per hand, against a shared clock
#[derive(Debug, Clone, Default)]
pub struct PlaybackDriver {
    left: Option<HandTimeline>,
    right: Option<HandTimeline>,
    ratio: Option<TempoRatio>,
}

impl PlaybackDriver {
    /// A driver that never vibrates
    pub fn inert() -> Self {
        Self::default()
    }

    /// Build timelines for the enabled hands from a parsed score
    pub fn from_score(score: &Score, settings: &PlaybackSettings) -> Result<Self, SetupError> {
        let ratio = score.tempo_ratio(settings.tempo_track)?;
        info!(
            tempo_track = settings.tempo_track,
            seconds_per_tick = ratio.seconds_per_tick(),
            "tempo resolved"
        );

        let build = |hand: Hand, side: Option<SideSettings>| -> Result<Option<HandTimeline>, SetupError> {
            let Some(side) = side else {
                return Ok(None);
            };
            score.check_track(side.track)?;

            let timeline = TrackTimeline::build(side.track, score.track_notes(side.track), ratio);
            if timeline.is_empty() {
                warn!(%hand, track = side.track, "track has no playable notes");
            } else {
                info!(%hand, track = side.track, notes = timeline.len(), "timeline built");
            }
            Ok(Some(HandTimeline::new(hand, side.amplitude, timeline)))
        };

        Ok(Self {
            left: build(Hand::Left, settings.left)?,
            right: build(Hand::Right, settings.right)?,
            ratio: Some(ratio),
        })
    }

    /// Read the file through `reader`, then build
    pub fn load<R: ScoreReader + ?Sized>(reader: &R, settings: &PlaybackSettings) -> Result<Self, SetupError> {
        let score = reader.read(&settings.path)?;
        Self::from_score(&score, settings)
    }

    /// Like `load`, but a setup failure is logged and yields an inert driver
    pub fn load_or_inert<R: ScoreReader + ?Sized>(reader: &R, settings: &PlaybackSettings) -> Self {
        match Self::load(reader, settings) {
            Ok(driver) => driver,
            Err(err) => {
                error!(path = %settings.path.display(), %err, "haptic playback disabled");
                Self::inert()
            }
        }
    }

    /// Emit a pulse for each hand whose next note has started by `time`
    /// `time` is seconds on the same clock the note start times are measured from
    pub fn advance<A: HapticActuator + ?Sized>(&mut self, time: f64, actuator: &mut A) -> Tick {
        let mut tick = Tick::default();
        for side in [&mut self.left, &mut self.right].into_iter().flatten() {
            if let Some(skipped) = side.advance(time, actuator) {
                tick.pulses += 1;
                tick.skipped += skipped;
            }
        }
        tick
    }

    pub fn side(&self, hand: Hand) -> Option<&HandTimeline> {
        match hand {
            Hand::Left => self.left.as_ref(),
            Hand::Right => self.right.as_ref(),
        }
    }

    /// Seconds per tick, None for an inert driver
    pub fn tempo_ratio(&self) -> Option<TempoRatio> {
        self.ratio
    }

    /// No hand has anything to play
    pub fn is_inert(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Every enabled hand has consumed its last note
    pub fn is_finished(&self) -> bool {
        Hand::BOTH
            .iter()
            .filter_map(|&hand| self.side(hand))
            .all(|side| side.timeline.is_finished())
    }

    /// Time the last note of either hand stops sounding
    pub fn end_time(&self) -> f64 {
        Hand::BOTH
            .iter()
            .filter_map(|&hand| self.side(hand))
            .flat_map(|side| side.timeline.notes())
            .map(|note| note.end_time())
            .fold(0.0, f64::max)
    }
}
