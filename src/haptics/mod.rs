pub mod log;
pub mod tone;

pub use self::log::LogActuator;
pub use self::tone::ToneActuator;

use tracing::debug;

use crate::types::pulse::{Hand, HapticPulse};

/// Anything that can make a controller vibrate
/// Fire-and-forget: implementations must not block and report nothing back
pub trait HapticActuator {
    fn execute(&mut self, pulse: &HapticPulse);

    /// Cancel whatever is vibrating on `hand`
    fn stop(&mut self, hand: Hand) {
        debug!(%hand, "stop requested");
        self.execute(&HapticPulse::stop(hand));
    }
}

impl<A: HapticActuator + ?Sized> HapticActuator for Box<A> {
    fn execute(&mut self, pulse: &HapticPulse) {
        (**self).execute(pulse);
    }
}
