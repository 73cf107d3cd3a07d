mod confirm;
mod form;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use form::handle_form;
use navigate::handle_navigate;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Record;
    use crate::tui::app::{ConfirmAction, FormTarget};
    use crate::tui::render::test_helpers::{contacts_app, todo_app};
    use pretty_assertions::assert_eq;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn tasks(app: &App) -> Vec<(String, bool)> {
        app.book
            .list()
            .records()
            .iter()
            .map(|r| {
                (
                    r.text("task").unwrap_or_default().to_string(),
                    r.flag("completed").unwrap_or(false),
                )
            })
            .collect()
    }

    #[test]
    fn quit_keys() {
        let mut app = todo_app(&[]);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = todo_app(&[]);
        app.mode = Mode::Form;
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn navigation_keys() {
        let mut app = todo_app(&[("a", false), ("b", false), ("c", false)]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 1);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn add_through_form() {
        let mut app = todo_app(&[("buy milk", false)]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Form);
        type_str(&mut app, "  pay bills ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.form.is_none());
        assert_eq!(
            tasks(&app),
            vec![("buy milk".into(), false), ("pay bills".into(), false)]
        );
        assert_eq!(app.selected_position(), Some(1));
        assert_eq!(app.status_message.as_deref(), Some("added 02"));
    }

    #[test]
    fn blank_required_field_keeps_form_open() {
        let mut app = todo_app(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form);
        assert_eq!(
            app.form.as_ref().and_then(|f| f.error.as_deref()),
            Some("task is required")
        );
        assert!(app.book.is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.form.is_none());
    }

    #[test]
    fn edit_through_form() {
        let mut app = todo_app(&[("buy milk", false), ("pay bills", false)]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.form.as_ref().map(|f| f.target), Some(FormTarget::Edit));
        for _ in 0.."bills".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "rent");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            tasks(&app),
            vec![("buy milk".into(), false), ("pay rent".into(), true)]
        );
    }

    #[test]
    fn toggle_selected_record() {
        let mut app = todo_app(&[("buy milk", false), ("pay bills", false)]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(tasks(&app)[1], ("pay bills".into(), true));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(tasks(&app)[1], ("pay bills".into(), false));
    }

    #[test]
    fn toggle_without_flag_field_reports_error() {
        let mut app = contacts_app(&["Alice"]);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.status_is_error);
    }

    #[test]
    fn delete_asks_first() {
        let mut app = todo_app(&[("a", false), ("b", false)]);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(app.confirm, Some(ConfirmAction::Delete));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.book.len(), 2);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(tasks(&app), vec![("b".into(), false)]);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn delete_without_confirmation() {
        let mut app = todo_app(&[("a", false), ("b", false)]);
        app.confirm_delete = false;
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(tasks(&app), vec![("a".into(), false)]);
        // Cursor moves back onto the last remaining row
        assert_eq!(app.selected_position(), Some(0));
    }

    #[test]
    fn clear_completed_after_confirmation() {
        let mut app = todo_app(&[("buy milk", false), ("pay bills", true)]);
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(
            app.confirm,
            Some(ConfirmAction::ClearFlag {
                flag: "completed".into()
            })
        );
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(tasks(&app), vec![("buy milk".into(), false)]);
        assert_eq!(app.status_message.as_deref(), Some("cleared 1 record(s)"));
    }

    #[test]
    fn clear_with_nothing_flagged_skips_prompt() {
        let mut app = todo_app(&[("buy milk", false)]);
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.book.len(), 1);
    }

    #[test]
    fn search_as_you_type_then_act_on_match() {
        let mut app = contacts_app(&["Alice", "Bob", "Alicia"]);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "ali");
        assert_eq!(app.visible_rows(), vec![0, 2]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.filter, "ali");

        // Second visible row is list position 2
        press(&mut app, KeyCode::Char('j'));
        app.confirm_delete = false;
        press(&mut app, KeyCode::Char('d'));
        let names: Vec<_> = app
            .book
            .list()
            .iter()
            .map(|(_, r)| r.text("name").unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(app.visible_rows(), vec![0]);
        assert_eq!(app.cursor, 0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filter, "");
        assert_eq!(app.visible_rows(), vec![0, 1]);
    }

    #[test]
    fn search_escape_clears_query() {
        let mut app = contacts_app(&["Alice", "Bob"]);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "bo");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.filter, "b");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.filter, "");
    }

    #[test]
    fn added_record_hidden_by_filter_is_still_selected() {
        let mut app = contacts_app(&["Alice", "Bob"]);
        app.filter = "ali".into();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Carol");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filter, "");
        assert_eq!(app.selected_record(), Some(&Record::new()
            .with("name", "Carol")
            .with("phone", "")
            .with("email", "")
            .with("address", "")));
    }
}
