use crossbeam_channel::Receiver;

use super::voice::PulseVoice;
use crate::types::pulse::{Hand, HapticPulse};

/// Renders haptic pulses as audio, one voice per hand
/// Runs in real-time audio thread - must be lock-free and allocation-free
pub struct PulseEngine {
    /// Indexed by `Hand::channel_index`
    voices: [PulseVoice; 2],
    pulse_rx: Receiver<HapticPulse>,
}

impl PulseEngine {
    pub fn new(sample_rate: f32, pulse_rx: Receiver<HapticPulse>) -> Self {
        Self {
            voices: [PulseVoice::new(sample_rate), PulseVoice::new(sample_rate)],
            pulse_rx,
        }
    }

    pub fn is_active(&self, hand: Hand) -> bool {
        self.voices[hand.channel_index()].is_active()
    }

    /// Fill an interleaved buffer
    /// Left hand on channel 0, right on channel 1; a mono device gets both mixed
    pub fn process(&mut self, output: &mut [f32], num_channels: usize) {
        // Process all pending pulses (non-blocking)
        while let Ok(pulse) = self.pulse_rx.try_recv() {
            self.voices[pulse.hand.channel_index()].trigger(&pulse);
        }

        if num_channels == 0 {
            return;
        }

        for frame in output.chunks_mut(num_channels) {
            let left = self.voices[0].next_sample();
            let right = self.voices[1].next_sample();

            frame.fill(0.0);
            if frame.len() >= 2 {
                frame[0] = left;
                frame[1] = right;
            } else {
                frame[0] = ((left + right) * 0.5).clamp(-1.0, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_left_pulse_on_left_channel_only() {
        let (pulse_tx, pulse_rx) = unbounded();
        let mut engine = PulseEngine::new(48000.0, pulse_rx);

        let _ = pulse_tx.try_send(HapticPulse::new(Hand::Left, 0.1, 440.0, 0.8));

        let mut output = vec![0.0f32; 512]; // 256 frames, 2 channels
        engine.process(&mut output, 2);

        let left_has_audio = output.iter().step_by(2).any(|&s| s.abs() > 0.001);
        let right_has_audio = output.iter().skip(1).step_by(2).any(|&s| s.abs() > 0.001);

        assert!(left_has_audio, "Left channel should have audio");
        assert!(!right_has_audio, "Right channel should be silent");
        assert!(engine.is_active(Hand::Left));
        assert!(!engine.is_active(Hand::Right));
    }

    #[test]
    fn test_extra_channels_stay_silent() {
        let (pulse_tx, pulse_rx) = unbounded();
        let mut engine = PulseEngine::new(48000.0, pulse_rx);

        let _ = pulse_tx.try_send(HapticPulse::new(Hand::Left, 0.1, 440.0, 0.8));
        let _ = pulse_tx.try_send(HapticPulse::new(Hand::Right, 0.1, 660.0, 0.8));

        let mut output = vec![1.0f32; 4 * 128];
        engine.process(&mut output, 4);

        assert!(output.iter().skip(2).step_by(4).all(|&s| s == 0.0));
        assert!(output.iter().skip(3).step_by(4).all(|&s| s == 0.0));
        assert!(output.iter().skip(1).step_by(4).any(|&s| s.abs() > 0.001));
    }

    #[test]
    fn test_mono_mix() {
        let (pulse_tx, pulse_rx) = unbounded();
        let mut engine = PulseEngine::new(48000.0, pulse_rx);

        let _ = pulse_tx.try_send(HapticPulse::new(Hand::Right, 0.1, 440.0, 1.0));

        let mut output = vec![0.0f32; 256];
        engine.process(&mut output, 1);
        assert!(output.iter().any(|&s| s.abs() > 0.001));
    }

    #[test]
    fn test_stop_silences_hand() {
        let (pulse_tx, pulse_rx) = unbounded();
        let mut engine = PulseEngine::new(48000.0, pulse_rx);

        let _ = pulse_tx.try_send(HapticPulse::new(Hand::Right, 5.0, 440.0, 1.0));
        let mut output = vec![0.0f32; 512];
        engine.process(&mut output, 2);
        assert!(engine.is_active(Hand::Right));

        let _ = pulse_tx.try_send(HapticPulse::stop(Hand::Right));
        engine.process(&mut output, 2);
        assert!(!engine.is_active(Hand::Right));
        assert!(output.iter().all(|&s| s == 0.0));
    }
}
