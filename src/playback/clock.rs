use std::time::{Duration, Instant};

/// Monotonic playback time, zero at `start`
/// Note start times are measured from the same zero
#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    started: Instant,
}

impl PlaybackClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Seconds since start
    pub fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Sleep length for a given tick rate
    pub fn frame_interval(frame_rate: u32) -> Duration {
        Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64)
    }
}
