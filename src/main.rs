mod audio;
mod config;
mod haptics;
#[cfg(test)]
mod log_capture;
mod midi;
mod playback;
mod types;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{OutputKind, PlayerConfig, TestPulseConfig};
use haptics::{HapticActuator, LogActuator, ToneActuator};
use midi::SmfReader;
use playback::{PlaybackClock, PlaybackDriver};
use types::pulse::{Hand, HapticPulse};
use ui::app::{App, ManualAction};
use ui::{events, render};

/// Plays MIDI tracks as controller vibration
#[derive(Parser, Debug)]
#[command(name = "midi-haptics")]
#[command(about = "Turn MIDI note onsets into left/right haptic pulses", long_about = None)]
struct Args {
    /// List available audio output devices and exit
    #[arg(short = 'l', long = "list")]
    list_devices: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a MIDI file described by a configuration file
    Play {
        /// Configuration file (YAML)
        #[arg(short = 'c', long = "config")]
        config: PathBuf,

        /// Run without the terminal monitor, logging to stderr
        #[arg(long)]
        headless: bool,

        /// Write the log here (the monitor defaults to midi-haptics.log)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Fire a single pulse, for checking a frequency by hand
    Pulse {
        #[arg(long, value_enum)]
        hand: Hand,

        /// Frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        frequency: f32,

        /// Duration in seconds
        #[arg(long, default_value_t = 0.5)]
        duration: f32,

        /// Strength (0.0 to 1.0)
        #[arg(long, default_value_t = 0.5)]
        amplitude: f32,

        #[arg(long, value_enum, default_value_t = OutputKind::Log)]
        output: OutputKind,

        /// Audio device for tone output (name substring or index)
        #[arg(long)]
        audio_device: Option<String>,
    },
}

/// Log file used under the monitor when none is given
const DEFAULT_LOG_FILE: &str = "midi-haptics.log";

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

impl<'a> LogTarget<'a> {
    /// The monitor owns the terminal, so it always logs to a file
    fn for_play(log_file: Option<&'a Path>, headless: bool) -> Self {
        match (log_file, headless) {
            (Some(path), _) => LogTarget::File(path),
            (None, true) => LogTarget::Stderr,
            (None, false) => LogTarget::File(Path::new(DEFAULT_LOG_FILE)),
        }
    }

    fn path(&self) -> Option<&'a Path> {
        match *self {
            LogTarget::File(path) => Some(path),
            LogTarget::Stderr => None,
        }
    }
}

fn init_tracing(target: LogTarget<'_>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).init(),
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
    }
    Ok(())
}

fn open_actuator(output: OutputKind, audio_device: Option<&str>) -> Result<Box<dyn HapticActuator>> {
    Ok(match output {
        OutputKind::Log => Box::new(LogActuator::new()),
        OutputKind::Tone => Box::new(ToneActuator::open(audio_device)?),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_devices {
        println!("Available Audio Output Devices:");
        for (i, device) in audio::device::list_audio_devices()?.iter().enumerate() {
            println!("  {}: {}", i, device);
        }
        return Ok(());
    }

    match args.command {
        Some(Command::Play { config, headless, log_file }) => {
            let target = LogTarget::for_play(log_file.as_deref(), headless);
            init_tracing(target)?;
            run_play(&config, headless, target.path())
        }
        Some(Command::Pulse { hand, frequency, duration, amplitude, output, audio_device }) => {
            init_tracing(LogTarget::Stderr)?;
            let test = TestPulseConfig { frequency, duration, amplitude };
            test.validate()?;
            run_pulse(test.pulse(hand), output, audio_device.as_deref())
        }
        None => {
            use clap::CommandFactory;
            Args::command().print_help()?;
            Ok(())
        }
    }
}

/// Load the configured file and play it until done or quit
fn run_play(config_path: &Path, headless: bool, log_path: Option<&Path>) -> Result<()> {
    let config = PlayerConfig::load(config_path)?;
    let settings = config.playback_settings()?;

    let mut actuator = open_actuator(config.output, config.audio_device.as_deref())?;

    // Setup errors leave the driver inert rather than failing the run
    let driver = PlaybackDriver::load_or_inert(&SmfReader, &settings);

    if headless {
        run_headless(driver, actuator.as_mut(), config.frame_rate);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let file_name = config
        .midi
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.midi.display().to_string());
    let mut app = App::new(file_name, config.output);
    if let Some(path) = log_path {
        app = app.with_log_file(path);
    }

    let result = run_monitor_loop(&mut terminal, &mut app, driver, actuator.as_mut(), &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Tick without a UI until every note has played and sounded out
fn run_headless(mut driver: PlaybackDriver, actuator: &mut dyn HapticActuator, frame_rate: u32) {
    if driver.is_inert() {
        return;
    }

    let interval = PlaybackClock::frame_interval(frame_rate);
    let end_time = driver.end_time();
    let clock = PlaybackClock::start();

    loop {
        let now = clock.now();
        driver.advance(now, &mut *actuator);

        if driver.is_finished() && now >= end_time {
            break;
        }
        std::thread::sleep(interval);
    }

    info!(elapsed = clock.now(), "playback finished");
}

/// Tick, draw and take keyboard input until quit
fn run_monitor_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut driver: PlaybackDriver,
    actuator: &mut dyn HapticActuator,
    config: &PlayerConfig,
) -> Result<()> {
    let interval = PlaybackClock::frame_interval(config.frame_rate);
    let clock = PlaybackClock::start();

    loop {
        let now = clock.now();
        driver.advance(now, &mut *actuator);

        for action in app.take_requests() {
            match action {
                ManualAction::TestPulse(hand) => actuator.execute(&config.test_pulse.pulse(hand)),
                ManualAction::StopAll => {
                    for hand in Hand::BOTH {
                        actuator.stop(hand);
                    }
                }
            }
        }

        app.sync(&driver, now);
        terminal.draw(|f| render::render(f, app))?;

        // Waiting for input doubles as the frame sleep
        events::handle_events(app, interval)?;

        if app.should_quit {
            break;
        }
    }

    for hand in Hand::BOTH {
        actuator.stop(hand);
    }
    Ok(())
}

/// Fire one pulse and stay alive long enough for it to play
fn run_pulse(pulse: HapticPulse, output: OutputKind, audio_device: Option<&str>) -> Result<()> {
    let mut actuator = open_actuator(output, audio_device)?;
    actuator.execute(&pulse);

    if output == OutputKind::Tone {
        std::thread::sleep(Duration::from_secs_f32(pulse.delay + pulse.duration) + Duration::from_millis(100));
    }
    Ok(())
}
