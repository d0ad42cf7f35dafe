use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::playback::driver::{PlaybackSettings, SideSettings};
use crate::types::pulse::{Hand, HapticPulse};

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// MIDI file to play
    pub midi: PathBuf,

    /// Track whose first tempo event sets the tick length
    #[serde(default)]
    pub tempo_track: usize,

    #[serde(default)]
    pub left: HandConfig,

    #[serde(default)]
    pub right: HandConfig,

    #[serde(default)]
    pub output: OutputKind,

    /// Audio device for tone output (name substring or index)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_device: Option<String>,

    /// Playback ticks per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    #[serde(default)]
    pub test_pulse: TestPulseConfig,
}

impl PlayerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PlayerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.left
            .validate()
            .context("Invalid configuration for left hand")?;
        self.right
            .validate()
            .context("Invalid configuration for right hand")?;

        if self.left.track_index()?.is_none() && self.right.track_index()?.is_none() {
            return Err(anyhow!("At least one of left or right must select a track"));
        }

        if self.frame_rate < 1 || self.frame_rate > 1000 {
            return Err(anyhow!("Frame rate must be between 1 and 1000 ticks per second"));
        }

        self.test_pulse
            .validate()
            .context("Invalid test pulse configuration")?;

        Ok(())
    }

    /// Playback settings for the driver
    pub fn playback_settings(&self) -> Result<PlaybackSettings> {
        Ok(PlaybackSettings {
            path: self.midi.clone(),
            tempo_track: self.tempo_track,
            left: self.left.side_settings()?,
            right: self.right.side_settings()?,
        })
    }
}

/// One controller's track binding
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandConfig {
    #[serde(default)]
    pub track: TrackSpec,

    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            track: TrackSpec::default(),
            amplitude: default_amplitude(),
        }
    }
}

impl HandConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(anyhow!("Amplitude must be between 0.0 and 1.0"));
        }
        self.track_index()?;
        Ok(())
    }

    /// Track index, or None when this hand is disabled
    pub fn track_index(&self) -> Result<Option<usize>> {
        match &self.track {
            TrackSpec::Index(-1) => Ok(None),
            TrackSpec::Index(index) if *index >= 0 => Ok(Some(*index as usize)),
            TrackSpec::Index(index) => Err(anyhow!("Invalid track index: {}", index)),
            TrackSpec::Off(word) => match word.to_lowercase().as_str() {
                "off" | "none" | "disabled" => Ok(None),
                _ => Err(anyhow!("Invalid track: {} (use an index or \"off\")", word)),
            },
        }
    }

    fn side_settings(&self) -> Result<Option<SideSettings>> {
        Ok(self.track_index()?.map(|track| SideSettings {
            track,
            amplitude: self.amplitude,
        }))
    }
}

/// Track selection - either an index or a disabled sentinel
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TrackSpec {
    Index(i64),
    Off(String), // "off", "none" or "disabled"
}

impl Default for TrackSpec {
    fn default() -> Self {
        TrackSpec::Off("off".to_string())
    }
}

/// Where pulses go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Log each pulse
    #[default]
    Log,
    /// Audition pulses as tones on the audio output
    Tone,
}

/// Manual test pulse fired from the monitor
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TestPulseConfig {
    #[serde(default = "default_test_frequency")]
    pub frequency: f32,
    #[serde(default = "default_test_duration")]
    pub duration: f32,
    #[serde(default = "default_test_amplitude")]
    pub amplitude: f32,
}

impl Default for TestPulseConfig {
    fn default() -> Self {
        Self {
            frequency: default_test_frequency(),
            duration: default_test_duration(),
            amplitude: default_test_amplitude(),
        }
    }
}

impl TestPulseConfig {
    pub fn validate(&self) -> Result<()> {
        // Written so NaN fails every check
        if !(self.frequency > 0.0 && self.frequency <= 20_000.0) {
            return Err(anyhow!("Test pulse frequency must be between 0 and 20000 Hz"));
        }
        if !(self.duration > 0.0 && self.duration <= 10.0) {
            return Err(anyhow!("Test pulse duration must be between 0 and 10 seconds"));
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(anyhow!("Test pulse amplitude must be between 0.0 and 1.0"));
        }
        Ok(())
    }

    pub fn pulse(&self, hand: Hand) -> HapticPulse {
        HapticPulse::new(hand, self.duration, self.frequency, self.amplitude)
    }
}

// Default value functions for serde
fn default_amplitude() -> f32 {
    0.1
}

fn default_frame_rate() -> u32 {
    90
}

fn default_test_frequency() -> f32 {
    440.0
}

fn default_test_duration() -> f32 {
    0.5
}

fn default_test_amplitude() -> f32 {
    0.5
}
