use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::search;
use crate::tui::app::{App, ConfirmAction, FormState, FormTarget, Mode};

use super::confirm::{clear_flagged, delete_selected};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.clear_status();

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Movement
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.visible_rows().len().saturating_sub(1);
        }

        // Records
        KeyCode::Char('a') => open_add_form(app),
        KeyCode::Char('e') | KeyCode::Enter => open_edit_form(app),
        KeyCode::Char(' ') | KeyCode::Char('x') => toggle_selected(app),
        KeyCode::Char('d') | KeyCode::Delete => request_delete(app),
        KeyCode::Char('C') => request_clear(app),

        // Search
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
            app.cursor = 0;
        }
        KeyCode::Esc => {
            if !app.filter.is_empty() {
                let position = app.selected_position();
                app.filter.clear();
                match position {
                    Some(p) => app.select_position(p),
                    None => app.clamp_cursor(),
                }
            }
        }
        _ => {}
    }
}

fn open_add_form(app: &mut App) {
    let schema = app.book.schema();
    app.form = Some(FormState::new(
        FormTarget::Add,
        schema,
        &schema.blank_record(),
    ));
    app.mode = Mode::Form;
}

fn open_edit_form(app: &mut App) {
    let Some(record) = app.selected_record().cloned() else {
        return;
    };
    app.form = Some(FormState::new(FormTarget::Edit, app.book.schema(), &record));
    app.mode = Mode::Form;
}

fn toggle_selected(app: &mut App) {
    let Some(position) = app.selected_position() else {
        return;
    };
    let Some(flag) = app.book.schema().first_flag().map(|f| f.name.clone()) else {
        app.set_error("this book has no flag fields");
        return;
    };
    if let Err(e) = app.book.toggle_flag(position, &flag) {
        app.show_book_error(&e);
    }
    app.clamp_cursor();
}

fn request_delete(app: &mut App) {
    if app.selected_position().is_none() {
        return;
    }
    if app.confirm_delete {
        app.confirm = Some(ConfirmAction::Delete);
        app.mode = Mode::Confirm;
    } else {
        delete_selected(app);
    }
}

fn request_clear(app: &mut App) {
    let Some(flag) = app.book.schema().first_flag().map(|f| f.name.clone()) else {
        app.set_error("this book has no flag fields");
        return;
    };
    let count = app.book.list().find(search::flag_predicate(&flag)).count();
    if count == 0 {
        app.set_status(format!("no records with {} set", flag));
        return;
    }
    if app.confirm_delete {
        app.confirm = Some(ConfirmAction::ClearFlag { flag });
        app.mode = Mode::Confirm;
    } else {
        clear_flagged(app, &flag);
    }
}
