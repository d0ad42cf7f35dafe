use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::app::{App, HandStatus};
use crate::types::frequency::note_name;
use crate::types::pulse::Hand;

/// Render the TUI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Song position
            Constraint::Min(8),    // Hands
            Constraint::Length(4), // Help
        ])
        .split(frame.size());

    render_title(frame, chunks[0], app);
    render_position(frame, chunks[1], app);

    let hands = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_hand(frame, hands[0], Hand::Left, app.hand(Hand::Left));
    render_hand(frame, hands[1], Hand::Right, app.hand(Hand::Right));

    if app.show_help {
        render_help(frame, chunks[3]);
    } else {
        render_status(frame, chunks[3], app);
    }
}

/// Render title bar
fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = Paragraph::new(format!("MIDI Haptics - {} ({:?} output)", app.file_name, app.output))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(title, area);
}

/// Render elapsed time against the end of the last note
fn render_position(frame: &mut Frame, area: Rect, app: &App) {
    let ratio = if app.end_time > 0.0 {
        (app.elapsed / app.end_time).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let gauge = Gauge::default()
        .block(Block::default().title("Position").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .label(position_label(app))
        .ratio(ratio);

    frame.render_widget(gauge, area);
}

fn position_label(app: &App) -> String {
    match app.seconds_per_tick {
        Some(seconds) => format!(
            "{:.2}s / {:.2}s  ({:.3} ms/tick)",
            app.elapsed,
            app.end_time,
            seconds * 1000.0
        ),
        None => format!("{:.2}s / {:.2}s", app.elapsed, app.end_time),
    }
}

/// Render one controller's panel
fn render_hand(frame: &mut Frame, area: Rect, hand: Hand, status: &HandStatus) {
    let title = match hand {
        Hand::Left => "Left Hand",
        Hand::Right => "Right Hand",
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(track) = status.track else {
        let disabled = Paragraph::new("Disabled")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(disabled, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let color = if status.is_finished() { Color::DarkGray } else { Color::Green };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .label(format!("{}/{}", status.cursor, status.total))
        .ratio(status.progress());
    frame.render_widget(gauge, rows[0]);

    let last = match status.last_pulse {
        Some(pulse) => format!("{:.1} Hz for {:.3}s", pulse.frequency, pulse.duration),
        None => "-".to_string(),
    };
    let state = if status.is_finished() { "finished" } else { "playing" };

    let mut lines = vec![
        Line::from(format!("Track: {}   Amplitude: {:.2}", track, status.amplitude)),
        Line::from(format!("State: {}", state)),
        Line::from(format!("Last pulse: {}", last)),
    ];
    if let Some(pulse) = status.last_pulse {
        if let Some(note) = nearest_note(pulse.frequency) {
            lines.push(Line::from(format!("Note: {}", note_name(note))));
        }
    }
    let skipped_style = if status.skipped > 0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    lines.push(Line::from(Span::styled(format!("Skipped: {}", status.skipped), skipped_style)));

    frame.render_widget(Paragraph::new(lines), rows[1]);
}

/// Closest table note to a frequency
fn nearest_note(frequency: f32) -> Option<u8> {
    if frequency <= 0.0 {
        return None;
    }
    let semitones = 12.0 * (frequency / 440.0).log2();
    Some((69 + semitones.round() as i32).clamp(0, 127) as u8)
}

/// Render the one-line status footer
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let status = if app.inert {
        Line::from(Span::styled(disabled_message(app), Style::default().fg(Color::Red)))
    } else if app.is_finished() {
        Line::from("All notes played")
    } else {
        Line::from("Playing")
    };

    let paragraph = Paragraph::new(vec![status, Line::from("Press ? for help")])
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));

    frame.render_widget(paragraph, area);
}

fn disabled_message(app: &App) -> String {
    match &app.log_file {
        Some(path) => format!("Playback disabled - see {} for the setup error", path),
        None => "Playback disabled by a setup error".to_string(),
    }
}

/// Render help text
fn render_help(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from("Controls:"),
        Line::from("  L/←: Test pulse left  |  R/→: Test pulse right  |  S/Space: Stop  |  Q/Esc: Quit"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputKind;
    use std::path::Path;

    #[test]
    fn test_disabled_message_names_log_file() {
        let app = App::new("a.mid".to_string(), OutputKind::Log).with_log_file(Path::new("midi-haptics.log"));
        assert_eq!(
            disabled_message(&app),
            "Playback disabled - see midi-haptics.log for the setup error"
        );

        let app = App::new("a.mid".to_string(), OutputKind::Log);
        assert!(!disabled_message(&app).contains("see"));
    }

    #[test]
    fn test_position_label_shows_tick_length() {
        let mut app = App::new("a.mid".to_string(), OutputKind::Log);
        app.elapsed = 1.0;
        app.end_time = 4.0;
        assert_eq!(position_label(&app), "1.00s / 4.00s");

        app.seconds_per_tick = Some(500_000.0 / 480.0 / 1_000_000.0);
        assert_eq!(position_label(&app), "1.00s / 4.00s  (1.042 ms/tick)");
    }

    #[test]
    fn test_nearest_note() {
        assert_eq!(nearest_note(440.0), Some(69));
        assert_eq!(nearest_note(261.63), Some(60));
        assert_eq!(nearest_note(0.0), None);
    }
}
