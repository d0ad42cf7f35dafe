use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller a pulse is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    /// Stereo channel used when auditioning pulses
    pub fn channel_index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => f.write_str("left"),
            Hand::Right => f.write_str("right"),
        }
    }
}

/// A single vibration request sent to a controller
/// Same five parameters every actuator accepts: delay, duration, frequency, amplitude, hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    /// Seconds to wait before starting
    pub delay: f32,
    /// Seconds to vibrate
    pub duration: f32,
    /// Vibration frequency in Hz
    pub frequency: f32,
    /// Normalized strength (0.0 to 1.0)
    pub amplitude: f32,
    pub hand: Hand,
}

impl HapticPulse {
    /// Create an immediate pulse
    pub fn new(hand: Hand, duration: f32, frequency: f32, amplitude: f32) -> Self {
        Self {
            delay: 0.0,
            duration,
            frequency,
            amplitude: amplitude.clamp(0.0, 1.0),
            hand,
        }
    }

    /// All-zero pulse: cancels whatever is vibrating on this hand
    pub fn stop(hand: Hand) -> Self {
        Self {
            delay: 0.0,
            duration: 0.0,
            frequency: 0.0,
            amplitude: 0.0,
            hand,
        }
    }

    /// Whether this is a stop request rather than a vibration
    pub fn is_stop(&self) -> bool {
        self.duration <= 0.0 || self.amplitude <= 0.0 || self.frequency <= 0.0
    }
}
