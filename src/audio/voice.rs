use super::oscillator::Oscillator;
use crate::types::pulse::HapticPulse;

/// Linear fade at both ends of a pulse to avoid clicks
const FADE_SECONDS: f32 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq)]
enum VoiceState {
    Idle,
    /// Counting down the pulse's delay
    Waiting { remaining: u64, length: u64 },
    Sounding { elapsed: u64, length: u64 },
}

/// One hand's pulse renderer
/// Monophonic: a new pulse replaces whatever is playing
pub struct PulseVoice {
    oscillator: Oscillator,
    state: VoiceState,
    amplitude: f32,
    sample_rate: f32,
}

impl PulseVoice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            oscillator: Oscillator::new(sample_rate),
            state: VoiceState::Idle,
            amplitude: 0.0,
            sample_rate,
        }
    }

    /// Start (or cancel, for a zero pulse) a vibration
    pub fn trigger(&mut self, pulse: &HapticPulse) {
        if pulse.is_stop() {
            self.state = VoiceState::Idle;
            return;
        }

        self.oscillator.set_frequency(pulse.frequency);
        self.oscillator.reset();
        self.amplitude = pulse.amplitude.clamp(0.0, 1.0);

        let length = self.seconds_to_samples(pulse.duration);
        let delay = self.seconds_to_samples(pulse.delay);
        self.state = if delay > 0 {
            VoiceState::Waiting { remaining: delay, length }
        } else {
            VoiceState::Sounding { elapsed: 0, length }
        };
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, VoiceState::Idle)
    }

    /// Generate next sample
    pub fn next_sample(&mut self) -> f32 {
        match self.state {
            VoiceState::Idle => 0.0,

            VoiceState::Waiting { remaining, length } => {
                self.state = if remaining <= 1 {
                    VoiceState::Sounding { elapsed: 0, length }
                } else {
                    VoiceState::Waiting { remaining: remaining - 1, length }
                };
                0.0
            }

            VoiceState::Sounding { elapsed, length } => {
                if elapsed >= length {
                    self.state = VoiceState::Idle;
                    return 0.0;
                }

                let gain = self.fade_gain(elapsed, length);
                let sample = self.oscillator.next_sample() * self.amplitude * gain;

                self.state = VoiceState::Sounding { elapsed: elapsed + 1, length };
                sample
            }
        }
    }

    fn fade_gain(&self, elapsed: u64, length: u64) -> f32 {
        let fade = self.seconds_to_samples(FADE_SECONDS).min(length / 2).max(1);
        let from_start = elapsed + 1;
        let to_end = length - elapsed;
        let edge = from_start.min(to_end).min(fade);
        edge as f32 / fade as f32
    }

    fn seconds_to_samples(&self, seconds: f32) -> u64 {
        (seconds.max(0.0) * self.sample_rate) as u64
    }
}
