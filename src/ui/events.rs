use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::app::{App, ManualAction};
use crate::types::pulse::Hand;

/// Handle keyboard events and update app state
/// Polls for at most `timeout` so the playback loop keeps its tick rate
pub fn handle_events(app: &mut App, timeout: Duration) -> anyhow::Result<()> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key_event(app, key);
            }
        }
    }
    Ok(())
}

/// Process individual key press
fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Check for Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        app.quit();
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit();
        }
        KeyCode::Char('?') | KeyCode::Char('h') => {
            app.toggle_help();
        }

        // Manual test harness
        KeyCode::Char('l') | KeyCode::Left => {
            app.request(ManualAction::TestPulse(Hand::Left));
        }
        KeyCode::Char('r') | KeyCode::Right => {
            app.request(ManualAction::TestPulse(Hand::Right));
        }
        KeyCode::Char('s') | KeyCode::Char(' ') => {
            app.request(ManualAction::StopAll);
        }

        _ => {}
    }
}
