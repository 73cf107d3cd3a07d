use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::record::Record;
use crate::model::schema::Schema;
use crate::model::{BookConfig, BookKind};
use crate::ops::book::Book;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over a memory-only book named "Test"
pub fn app_with_records(kind: BookKind, records: Vec<Record>) -> App {
    let config = BookConfig::new("Test", kind, None);
    let mut book = Book::in_memory(config.schema().unwrap());
    for record in &records {
        book.add(record).unwrap();
    }
    App::new(book, &config, None)
}

/// To-do app from `(task, completed)` pairs
pub fn todo_app(tasks: &[(&str, bool)]) -> App {
    let records = tasks
        .iter()
        .map(|(task, done)| Record::new().with("task", *task).with("completed", *done))
        .collect();
    app_with_records(BookKind::Todo, records)
}

/// Contact book app with one contact per name
pub fn contacts_app(names: &[&str]) -> App {
    let records = names
        .iter()
        .map(|name| Record::new().with("name", *name))
        .collect();
    app_with_records(BookKind::Contacts, records)
}

#[test]
fn helpers_build_expected_schemas() {
    assert_eq!(todo_app(&[]).book.schema(), &Schema::todo());
    assert_eq!(contacts_app(&["A"]).book.schema(), &Schema::contacts());
}
