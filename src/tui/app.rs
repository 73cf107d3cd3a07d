use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::cli::handlers::resolve_start_dir;
use crate::io::book_io::{self, BOOK_DIR, LOG_FILE};
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::model::record::{FieldValue, Record};
use crate::model::schema::{FieldKind, Schema};
use crate::model::BookConfig;
use crate::ops::book::{Book, BookError};
use crate::ops::search;
use crate::util::{logging, unicode};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a search query; the list filters as you type
    Search,
    /// Add/edit form is open
    Form,
    /// Waiting for y/n on a destructive action
    Confirm,
}

/// What submitting the form does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Add,
    /// Update the selected record (resolved again on submit)
    Edit,
}

/// One input row of the form
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Text being edited (text fields)
    pub buffer: String,
    /// Current value (flag fields)
    pub checked: bool,
}

/// State of the add/edit form
#[derive(Debug, Clone)]
pub struct FormState {
    pub target: FormTarget,
    pub fields: Vec<FormField>,
    /// Index of the focused field
    pub focus: usize,
    /// Byte offset of the cursor in the focused text field
    pub cursor: usize,
    /// Last validation error, shown under the fields
    pub error: Option<String>,
}

impl FormState {
    /// A form prefilled from `record` (or schema defaults for a blank record)
    pub fn new(target: FormTarget, schema: &Schema, record: &Record) -> Self {
        let fields: Vec<FormField> = schema
            .fields()
            .iter()
            .map(|def| FormField {
                name: def.name.clone(),
                kind: def.kind,
                required: def.required,
                buffer: record.text(&def.name).unwrap_or_default().to_string(),
                checked: record.flag(&def.name).unwrap_or(false),
            })
            .collect();
        let cursor = fields.first().map_or(0, |f| f.buffer.len());
        FormState {
            target,
            fields,
            focus: 0,
            cursor,
            error: None,
        }
    }

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    fn focus_to(&mut self, index: usize) {
        self.focus = index;
        self.cursor = self.fields.get(index).map_or(0, |f| f.buffer.len());
    }

    /// Move focus down, wrapping to the first field
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus_to((self.focus + 1) % self.fields.len());
        }
    }

    /// Move focus up, wrapping to the last field
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            let len = self.fields.len();
            self.focus_to((self.focus + len - 1) % len);
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(field) = self.focused_mut()
            && field.kind == FieldKind::Text
        {
            field.buffer.insert(cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    /// Delete the grapheme before the cursor
    pub fn backspace(&mut self) {
        let cursor = self.cursor;
        if let Some(field) = self.focused_mut()
            && cursor > 0
        {
            let start = unicode::prev_grapheme_boundary(&field.buffer, cursor);
            field.buffer.replace_range(start..cursor, "");
            self.cursor = start;
        }
    }

    /// Delete the grapheme under the cursor
    pub fn delete_forward(&mut self) {
        let cursor = self.cursor;
        if let Some(field) = self.focused_mut()
            && cursor < field.buffer.len()
        {
            let end = unicode::next_grapheme_boundary(&field.buffer, cursor);
            field.buffer.replace_range(cursor..end, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(field) = self.focused() {
            self.cursor = unicode::prev_grapheme_boundary(&field.buffer, self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(field) = self.focused() {
            self.cursor = unicode::next_grapheme_boundary(&field.buffer, self.cursor);
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.focused().map_or(0, |f| f.buffer.len());
    }

    /// Flip the focused flag field. Returns false if the focus is on text.
    pub fn toggle_focused_flag(&mut self) -> bool {
        match self.focused_mut() {
            Some(field) if field.kind == FieldKind::Flag => {
                field.checked = !field.checked;
                true
            }
            _ => false,
        }
    }

    /// Every field, as caller values for add/update
    pub fn to_record(&self) -> Record {
        self.fields
            .iter()
            .map(|f| {
                let value = match f.kind {
                    FieldKind::Text => FieldValue::Text(f.buffer.clone()),
                    FieldKind::Flag => FieldValue::Flag(f.checked),
                };
                (f.name.clone(), value)
            })
            .collect()
    }
}

/// A destructive action waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete the selected record
    Delete,
    /// Remove every record with `flag` set
    ClearFlag { flag: String },
}

/// Main application state
pub struct App {
    pub book: Book,
    pub book_name: String,
    /// Where .state.json lives; None for a book not opened from disk
    pub book_dir: Option<PathBuf>,
    pub confirm_delete: bool,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Cursor index into the visible rows (not a list position)
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Search query; empty means no filter
    pub filter: String,
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmAction>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

impl App {
    pub fn new(book: Book, config: &BookConfig, book_dir: Option<PathBuf>) -> Self {
        let status_message = (!book.is_persistent())
            .then(|| "memory only: changes are discarded on exit".to_string());
        App {
            book,
            book_name: config.book.name.clone(),
            book_dir,
            confirm_delete: config.ui.confirm_delete,
            theme: Theme::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            cursor: 0,
            scroll_offset: 0,
            filter: String::new(),
            form: None,
            confirm: None,
            status_message,
            status_is_error: false,
        }
    }

    /// List positions of the rows on screen, recomputed from the live list
    /// and the live filter.
    pub fn visible_rows(&self) -> Vec<usize> {
        if self.filter.trim().is_empty() {
            (0..self.book.len()).collect()
        } else {
            search::search_positions(self.book.list(), &self.filter)
        }
    }

    /// The list position under the cursor, resolved now
    pub fn selected_position(&self) -> Option<usize> {
        self.visible_rows().get(self.cursor).copied()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected_position().and_then(|p| self.book.get(p))
    }

    /// Keep the cursor on a visible row after the list or filter changed
    pub fn clamp_cursor(&mut self) {
        let count = self.visible_rows().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.visible_rows().len();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(count - 1);
    }

    /// Put the cursor on `position`, clearing the filter if it hides that record
    pub fn select_position(&mut self, position: usize) {
        if !self.visible_rows().contains(&position) {
            self.filter.clear();
        }
        if let Some(row) = self.visible_rows().iter().position(|&p| p == position) {
            self.cursor = row;
        }
    }

    /// Regex for highlighting the active filter in rendered rows
    pub fn search_re(&self) -> Option<Regex> {
        search::highlight_regex(&self.filter)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    pub fn show_book_error(&mut self, err: &BookError) {
        tracing::warn!(error = %err, "book operation failed");
        self.set_error(err.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }
}

fn restore_ui_state(app: &mut App) {
    let Some(dir) = &app.book_dir else { return };
    let Some(state) = read_ui_state(dir) else {
        return;
    };
    if let Some(query) = state.last_search {
        app.filter = query;
    }
    app.cursor = state.cursor;
    app.clamp_cursor();
}

fn save_ui_state(app: &App) {
    let Some(dir) = &app.book_dir else { return };
    let state = UiState {
        cursor: app.cursor,
        last_search: (!app.filter.trim().is_empty()).then(|| app.filter.clone()),
    };
    if let Err(e) = write_ui_state(dir, &state) {
        tracing::debug!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(book_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = resolve_start_dir(book_dir)?;
    let root = book_io::discover_book(&start)?;
    logging::init_file(&root.join(BOOK_DIR).join(LOG_FILE))?;
    let open = book_io::open_book(&root)?;
    tracing::info!(book = %open.config.book.name, records = open.book.len(), "starting TUI");

    let mut app = App::new(open.book, &open.config, Some(open.book_dir));
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
