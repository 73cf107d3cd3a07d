use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::output::format_serial;
use crate::ops::search;
use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let action = app.confirm.take();
            app.mode = Mode::Navigate;
            match action {
                Some(ConfirmAction::Delete) => delete_selected(app),
                Some(ConfirmAction::ClearFlag { flag }) => clear_flagged(app, &flag),
                None => {}
            }
        }
        // Cancel: n or Esc
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

/// Delete the record under the cursor, resolving its position now
pub(super) fn delete_selected(app: &mut App) {
    let Some(position) = app.selected_position() else {
        return;
    };
    match app.book.delete(position) {
        Ok(_) => app.set_status(format!("deleted {}", format_serial(position))),
        Err(e) => app.show_book_error(&e),
    }
    app.clamp_cursor();
}

pub(super) fn clear_flagged(app: &mut App, flag: &str) {
    match app.book.clear_where(search::flag_predicate(flag)) {
        Ok(removed) => app.set_status(format!("cleared {} record(s)", removed.len())),
        Err(e) => app.show_book_error(&e),
    }
    app.clamp_cursor();
}
