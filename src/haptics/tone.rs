use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Sender, TrySendError};
use tracing::{info, warn};

use super::HapticActuator;
use crate::audio::device::start_pulse_stream;
use crate::types::pulse::HapticPulse;

/// Plays each pulse as a sine tone: left hand on the left speaker, right on the right
/// Lets a pattern be auditioned without controllers
pub struct ToneActuator {
    pulse_tx: Sender<HapticPulse>,
    _stream: cpal::Stream,
}

impl ToneActuator {
    /// Open an audio output (by name substring or index; None for the default)
    pub fn open(device: Option<&str>) -> Result<Self> {
        let (pulse_tx, pulse_rx) = unbounded();
        let stream = start_pulse_stream(device, pulse_rx)
            .context("Failed to start audio output for tone preview")?;

        info!(device = device.unwrap_or("default"), "tone preview output ready");

        Ok(Self {
            pulse_tx,
            _stream: stream,
        })
    }
}

impl HapticActuator for ToneActuator {
    fn execute(&mut self, pulse: &HapticPulse) {
        send_pulse(&self.pulse_tx, pulse);
    }
}

/// Hand a pulse to the audio thread without blocking the playback loop
/// Returns false when the pulse was lost
fn send_pulse(tx: &Sender<HapticPulse>, pulse: &HapticPulse) -> bool {
    match tx.try_send(*pulse) {
        Ok(()) => true,
        Err(TrySendError::Disconnected(_)) => {
            warn!(hand = %pulse.hand, "audio stream is gone, pulse dropped");
            false
        }
        Err(TrySendError::Full(_)) => {
            warn!(hand = %pulse.hand, "audio queue full, pulse dropped");
            false
        }
    }
}
