use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::io::recovery::atomic_write;
use crate::model::record::{FieldValue, Record};

/// Error type for durable store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
        /// The unparseable file content
        raw: String,
    },
    #[error("could not serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Where a book's records live between runs.
///
/// `save` always receives the complete ordered list and replaces whatever
/// was stored before.
pub trait RecordStore {
    /// Read every stored record, in order
    fn load(&self) -> Result<Vec<Record>, StoreError>;

    /// Replace the stored records with `records`
    fn save(&mut self, records: &[Record]) -> Result<(), StoreError>;

    /// Backing file, if any
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Whether saved records survive the process
    fn is_durable(&self) -> bool {
        self.path().is_some()
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// A single JSON file holding an array of record objects
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }
}

impl RecordStore for JsonFileStore {
    /// A missing file is an empty list (first run), not an error.
    fn load(&self) -> Result<Vec<Record>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let rows: Vec<IndexMap<String, Value>> =
            serde_json::from_str(&content).map_err(|e| StoreError::Parse {
                path: self.path.clone(),
                source: e,
                raw: content.clone(),
            })?;
        let records: Vec<Record> = rows.into_iter().map(record_from_row).collect();
        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    fn save(&mut self, records: &[Record]) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(records)?;
        content.push('\n');
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "saved records");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Keep the text and flag values of a stored row. Anything else (numbers,
/// null, nested values) is dropped so the schema defaults it on load.
fn record_from_row(row: IndexMap<String, Value>) -> Record {
    row.into_iter()
        .filter_map(|(name, value)| {
            let value = match value {
                Value::String(s) => FieldValue::Text(s),
                Value::Bool(b) => FieldValue::Flag(b),
                other => {
                    tracing::debug!(field = %name, value = %other, "dropping stored value");
                    return None;
                }
            };
            Some((name, value))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Holds the last saved snapshot for the life of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Vec<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, records: &[Record]) -> Result<(), StoreError> {
        self.snapshot = records.to_vec();
        Ok(())
    }
}
