use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.filter.clear();
            app.mode = Mode::Navigate;
            app.cursor = 0;
        }
        KeyCode::Enter => {
            if app.filter.trim().is_empty() {
                app.filter.clear();
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            app.filter.pop();
            app.cursor = 0;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.filter.push(c);
            app.cursor = 0;
        }
        _ => {}
    }
}
