use std::f32::consts::TAU;

/// Highest playable frequency as a fraction of the sample rate
const MAX_FREQUENCY_RATIO: f32 = 0.45;

/// Sine source for one preview voice
///
/// Phase is kept in cycles (`0.0..1.0`) and stepped once per output sample.
/// The top of the MIDI table (12.5 kHz) is past Nyquist on low-rate devices,
/// so frequencies are capped at `MAX_FREQUENCY_RATIO` of the sample rate.
pub struct Oscillator {
    cycle: f32,
    step: f32,
    frequency: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            cycle: 0.0,
            step: 0.0,
            frequency: 0.0,
            sample_rate,
        };
        osc.set_frequency(440.0);
        osc
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(0.0, self.sample_rate * MAX_FREQUENCY_RATIO);
        self.step = self.frequency / self.sample_rate;
    }

    /// Restart at a zero crossing so every pulse begins silent
    pub fn reset(&mut self) {
        self.cycle = 0.0;
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample = (self.cycle * TAU).sin();
        self.cycle = (self.cycle + self.step).fract();
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_a4() {
        let osc = Oscillator::new(44100.0);
        assert_eq!(osc.frequency, 440.0);
    }

    #[test]
    fn test_frequency_clamped_below_nyquist() {
        let mut osc = Oscillator::new(8000.0);
        osc.set_frequency(12_543.85);
        assert!(osc.frequency < 4000.0);

        osc.set_frequency(880.0);
        assert_eq!(osc.frequency, 880.0);
    }

    #[test]
    fn test_starts_at_zero_crossing() {
        let mut osc = Oscillator::new(48000.0);
        osc.set_frequency(1000.0);
        for _ in 0..17 {
            osc.next_sample();
        }
        osc.reset();
        assert_eq!(osc.next_sample(), 0.0);
    }

    #[test]
    fn test_quarter_cycle_peaks() {
        // 250 Hz at 1 kHz: four samples per cycle
        let mut osc = Oscillator::new(1000.0);
        osc.set_frequency(250.0);
        osc.next_sample();
        assert!((osc.next_sample() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_output_in_range() {
        let mut osc = Oscillator::new(48000.0);
        osc.set_frequency(1000.0);
        assert!((0..1000).map(|_| osc.next_sample()).all(|s| (-1.0..=1.0).contains(&s)));
    }
}
