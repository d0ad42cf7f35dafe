use std::path::Path;

use crate::config::OutputKind;
use crate::playback::PlaybackDriver;
use crate::types::pulse::{Hand, HapticPulse};

/// Something the user asked for from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualAction {
    /// Fire the configured test pulse on one hand
    TestPulse(Hand),
    /// Zero pulse on both hands; timelines keep their position
    StopAll,
}

/// Snapshot of one hand's playback for display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandStatus {
    /// None when the hand is disabled
    pub track: Option<usize>,
    pub amplitude: f32,
    pub cursor: usize,
    pub total: usize,
    pub skipped: usize,
    pub last_pulse: Option<HapticPulse>,
}

impl HandStatus {
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.total
    }

    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.cursor as f64 / self.total as f64
        }
    }
}

/// UI application state
pub struct App {
    /// MIDI file being played, for the title
    pub file_name: String,
    pub output: OutputKind,
    /// Seconds since playback started
    pub elapsed: f64,
    /// Seconds until the last note ends
    pub end_time: f64,
    /// Indexed by `Hand::channel_index`
    pub hands: [HandStatus; 2],
    /// Seconds per MIDI tick, None while inert
    pub seconds_per_tick: Option<f64>,
    /// Where diagnostics are written, shown when playback is disabled
    pub log_file: Option<String>,
    /// Playback disabled by a setup error
    pub inert: bool,
    /// Whether to quit the application
    pub should_quit: bool,
    /// Whether to show help screen
    pub show_help: bool,
    pending: Vec<ManualAction>,
}

impl App {
    pub fn new(file_name: String, output: OutputKind) -> Self {
        Self {
            file_name,
            output,
            elapsed: 0.0,
            end_time: 0.0,
            hands: Default::default(),
            seconds_per_tick: None,
            log_file: None,
            inert: false,
            should_quit: false,
            show_help: false,
            pending: Vec::new(),
        }
    }

    pub fn with_log_file(mut self, path: &Path) -> Self {
        self.log_file = Some(path.display().to_string());
        self
    }

    /// Copy the driver's current state into the view
    pub fn sync(&mut self, driver: &PlaybackDriver, elapsed: f64) {
        self.elapsed = elapsed;
        self.end_time = driver.end_time();
        self.inert = driver.is_inert();
        self.seconds_per_tick = driver.tempo_ratio().map(|ratio| ratio.seconds_per_tick());

        for hand in Hand::BOTH {
            self.hands[hand.channel_index()] = match driver.side(hand) {
                Some(side) => HandStatus {
                    track: Some(side.timeline.track()),
                    amplitude: side.amplitude,
                    cursor: side.timeline.cursor(),
                    total: side.timeline.len(),
                    skipped: side.skipped,
                    last_pulse: side.last_pulse,
                },
                None => HandStatus::default(),
            };
        }
    }

    pub fn hand(&self, hand: Hand) -> &HandStatus {
        &self.hands[hand.channel_index()]
    }

    /// Every enabled hand is done
    pub fn is_finished(&self) -> bool {
        self.hands
            .iter()
            .filter(|status| status.track.is_some())
            .all(HandStatus::is_finished)
    }

    /// Queue a manual action for the playback loop
    pub fn request(&mut self, action: ManualAction) {
        self.pending.push(action);
    }

    /// Drain queued manual actions
    pub fn take_requests(&mut self) -> Vec<ManualAction> {
        std::mem::take(&mut self.pending)
    }

    /// Mark app for quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Toggle help screen visibility
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
