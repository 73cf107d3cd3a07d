use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cli::output::format_serial;
use crate::model::schema::FieldKind;
use crate::ops::book::BookError;
use crate::ops::record_list::ListError;
use crate::tui::app::{App, FormTarget, Mode};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => submit_form(app),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.move_left(),
        KeyCode::Right => form.move_right(),
        KeyCode::Home => form.move_home(),
        KeyCode::End => form.move_end(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Delete => form.delete_forward(),
        KeyCode::Char(' ') if form.focused().is_some_and(|f| f.kind == FieldKind::Flag) => {
            form.toggle_focused_flag();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.insert_char(c);
        }
        _ => {}
    }
}

fn submit_form(app: &mut App) {
    let Some((target, values)) = app.form.as_ref().map(|f| (f.target, f.to_record())) else {
        return;
    };

    let result = match target {
        FormTarget::Add => app.book.add(&values),
        FormTarget::Edit => match app.selected_position() {
            Some(position) => app.book.update(position, &values).map(|()| position),
            None => {
                app.form = None;
                app.mode = Mode::Navigate;
                app.set_error("the record being edited is gone");
                return;
            }
        },
    };

    let position = match result {
        Ok(position) => position,
        Err(BookError::List(ListError::Validation(e))) => {
            if let Some(form) = app.form.as_mut() {
                form.error = Some(e.to_string());
            }
            return;
        }
        Err(BookError::List(e)) => {
            app.form = None;
            app.mode = Mode::Navigate;
            app.set_error(e.to_string());
            app.clamp_cursor();
            return;
        }
        Err(e @ BookError::Persistence(_)) => {
            // The change is in memory; show it and report the failed save
            app.form = None;
            app.mode = Mode::Navigate;
            app.show_book_error(&e);
            app.clamp_cursor();
            return;
        }
    };

    app.form = None;
    app.mode = Mode::Navigate;
    app.select_position(position);
    let verb = match target {
        FormTarget::Add => "added",
        FormTarget::Edit => "updated",
    };
    app.set_status(format!("{} {}", verb, format_serial(position)));
}
