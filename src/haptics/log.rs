use tracing::info;

use super::HapticActuator;
use crate::types::pulse::HapticPulse;

/// Actuator that only writes each pulse to the log
/// Useful without hardware attached, or to inspect a file's timing
#[derive(Debug, Default)]
pub struct LogActuator {
    executed: u64,
}

impl LogActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests seen so far, stops included
    #[cfg(test)]
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl HapticActuator for LogActuator {
    fn execute(&mut self, pulse: &HapticPulse) {
        self.executed += 1;
        if pulse.is_stop() {
            info!(seq = self.executed, hand = %pulse.hand, "haptic stop");
        } else {
            info!(
                seq = self.executed,
                hand = %pulse.hand,
                delay = pulse.delay,
                duration = pulse.duration,
                frequency = pulse.frequency,
                amplitude = pulse.amplitude,
                "haptic pulse"
            );
        }
    }
}
