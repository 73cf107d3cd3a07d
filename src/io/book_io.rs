use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store::{JsonFileStore, MemoryStore, RecordStore};
use crate::model::config::BookConfig;
use crate::model::schema::SchemaError;
use crate::ops::book::Book;

/// Name of the directory that marks a book root
pub const BOOK_DIR: &str = "recordbook";
/// Config file inside the book directory
pub const CONFIG_FILE: &str = "book.toml";
/// TUI diagnostics log inside the book directory
pub const LOG_FILE: &str = "recordbook.log";

/// Error type for book directory I/O
#[derive(Debug, thiserror::Error)]
pub enum BookIoError {
    #[error("not a recordbook directory: no recordbook/book.toml found (try `rb init`)")]
    NotABook,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse book.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not serialize book.toml: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),
    #[error("invalid field definitions in book.toml: {0}")]
    InvalidSchema(#[from] SchemaError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A book opened from disk together with where it lives
#[derive(Debug)]
pub struct OpenBook {
    /// Directory containing `recordbook/`
    pub root: PathBuf,
    /// The `recordbook/` directory
    pub book_dir: PathBuf,
    pub config: BookConfig,
    pub book: Book,
}

/// Walk up from `start` looking for `recordbook/book.toml`.
pub fn discover_book(start: &Path) -> Result<PathBuf, BookIoError> {
    let mut current = start.to_path_buf();
    loop {
        let book_dir = current.join(BOOK_DIR);
        if book_dir.is_dir() && book_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BookIoError::NotABook);
        }
    }
}

pub fn read_config(book_dir: &Path) -> Result<BookConfig, BookIoError> {
    let config_path = book_dir.join(CONFIG_FILE);
    let text = fs::read_to_string(&config_path).map_err(|e| BookIoError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

pub fn write_config(book_dir: &Path, config: &BookConfig) -> Result<(), BookIoError> {
    let text = toml::to_string_pretty(config)?;
    crate::io::recovery::atomic_write(&book_dir.join(CONFIG_FILE), text.as_bytes())?;
    Ok(())
}

/// Load config and records for the book rooted at `root`.
pub fn open_book(root: &Path) -> Result<OpenBook, BookIoError> {
    let book_dir = root.join(BOOK_DIR);
    if !book_dir.is_dir() {
        return Err(BookIoError::NotABook);
    }
    let config = read_config(&book_dir)?;
    let schema = config.schema()?;

    let store: Box<dyn RecordStore> = match &config.store {
        Some(store) => Box::new(JsonFileStore::new(book_dir.join(&store.file))),
        None => Box::new(MemoryStore::new()),
    };
    tracing::debug!(root = %root.display(), kind = ?config.book.kind, "opening book");
    let book = Book::open(schema, store);

    Ok(OpenBook {
        root: root.to_path_buf(),
        book_dir,
        config,
        book,
    })
}

/// Create `recordbook/` under `root` with the given config.
pub fn create_book(root: &Path, config: &BookConfig) -> Result<PathBuf, BookIoError> {
    let book_dir = root.join(BOOK_DIR);
    fs::create_dir_all(&book_dir)?;
    write_config(&book_dir, config)?;
    Ok(book_dir)
}
