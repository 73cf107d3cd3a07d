use std::path::Path;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store::{MemoryStore, RecordStore, StoreError};
use crate::model::record::Record;
use crate::model::schema::Schema;
use crate::ops::record_list::{ListError, RecordList};

/// Error type for book operations
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error(transparent)]
    List(#[from] ListError),
    /// The in-memory change was applied but the snapshot did not reach the store
    #[error("change kept in memory but not saved: {0}")]
    Persistence(#[source] StoreError),
}

/// A record list bound to its store. Every mutation is followed by a
/// full-snapshot save.
pub struct Book {
    list: RecordList,
    store: Box<dyn RecordStore>,
}

impl std::fmt::Debug for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Book")
            .field("list", &self.list)
            .field("store", &self.store.path())
            .finish()
    }
}

impl Book {
    /// Load the book from `store`. Unreadable or corrupt content is copied to
    /// the recovery log and the book starts empty.
    pub fn open(schema: Schema, store: Box<dyn RecordStore>) -> Self {
        let records = match store.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "could not load records, starting with an empty list");
                if let Some(dir) = store.path().and_then(Path::parent) {
                    displace_unreadable(dir, &e);
                }
                Vec::new()
            }
        };
        Book {
            list: RecordList::from_stored(schema, records),
            store,
        }
    }

    /// A session-only book
    pub fn in_memory(schema: Schema) -> Self {
        Book::open(schema, Box::new(MemoryStore::new()))
    }

    pub fn list(&self) -> &RecordList {
        &self.list
    }

    pub fn schema(&self) -> &Schema {
        self.list.schema()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.list.get(position)
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_durable()
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store.path()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add(&mut self, values: &Record) -> Result<usize, BookError> {
        let position = self.list.add(values)?;
        self.save()?;
        Ok(position)
    }

    pub fn update(&mut self, position: usize, changes: &Record) -> Result<(), BookError> {
        self.list.update(position, changes)?;
        self.save()
    }

    pub fn delete(&mut self, position: usize) -> Result<Record, BookError> {
        let removed = self.list.delete(position)?;
        self.save()?;
        Ok(removed)
    }

    pub fn toggle_flag(&mut self, position: usize, flag: &str) -> Result<bool, BookError> {
        let value = self.list.toggle_flag(position, flag)?;
        self.save()?;
        Ok(value)
    }

    /// Remove matching records. Saves only when something was removed.
    pub fn clear_where<P>(&mut self, predicate: P) -> Result<Vec<Record>, BookError>
    where
        P: Fn(&Record) -> bool,
    {
        let removed = self.list.clear_where(predicate);
        if !removed.is_empty() {
            self.save()?;
        }
        Ok(removed)
    }

    /// Write the full list to the store. On failure the snapshot goes to the
    /// recovery log and the in-memory list is left as is.
    pub fn save(&mut self) -> Result<(), BookError> {
        if let Err(e) = self.store.save(self.list.records()) {
            tracing::error!(error = %e, "save failed");
            if let Some(dir) = self.store.path().and_then(Path::parent) {
                let snapshot = serde_json::to_string_pretty(self.list.records())
                    .unwrap_or_default();
                recovery::log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Write, "save failed", snapshot)
                        .field("Error", e.to_string()),
                );
            }
            return Err(BookError::Persistence(e));
        }
        Ok(())
    }
}

fn displace_unreadable(dir: &Path, error: &StoreError) {
    let (source, raw) = match error {
        StoreError::Parse { path, raw, .. } => (path, raw.clone()),
        StoreError::Read { path, .. } => (path, String::new()),
        _ => return,
    };
    recovery::log_recovery(
        dir,
        RecoveryEntry::new(RecoveryCategory::Load, "unreadable store", raw)
            .field("Source", source.display().to_string())
            .field("Error", error.to_string()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::read_recovery_entries;
    use crate::io::store::JsonFileStore;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn todo(text: &str) -> Record {
        Record::new().with("task", text)
    }

    fn open_json(dir: &Path) -> Book {
        Book::open(
            Schema::todo(),
            Box::new(JsonFileStore::new(dir.join("todos.json"))),
        )
    }

    #[test]
    fn every_mutation_is_saved() {
        let tmp = TempDir::new().unwrap();
        let mut book = open_json(tmp.path());
        book.add(&todo("buy milk")).unwrap();
        book.add(&todo("pay bills")).unwrap();
        book.toggle_flag(0, "completed").unwrap();
        book.update(1, &todo("pay all bills")).unwrap();

        let reopened = open_json(tmp.path());
        assert_eq!(reopened.list().records(), book.list().records());
        assert_eq!(reopened.get(0).unwrap().flag("completed"), Some(true));

        book.delete(0).unwrap();
        assert_eq!(open_json(tmp.path()).len(), 1);
    }

    #[test]
    fn round_trip_preserves_order_and_fields() {
        let tmp = TempDir::new().unwrap();
        let mut book = open_json(tmp.path());
        for t in ["one", "two", "three"] {
            book.add(&todo(t)).unwrap();
        }
        book.toggle_flag(1, "completed").unwrap();
        let reopened = open_json(tmp.path());
        assert_eq!(reopened.list().records(), book.list().records());
    }

    #[test]
    fn clear_completed_persists() {
        let tmp = TempDir::new().unwrap();
        let mut book = open_json(tmp.path());
        book.add(&todo("buy milk")).unwrap();
        book.add(&todo("pay bills")).unwrap();
        book.toggle_flag(0, "completed").unwrap();
        let removed = book
            .clear_where(|r| r.flag("completed") == Some(true))
            .unwrap();
        assert_eq!(removed.len(), 1);
        let reopened = open_json(tmp.path());
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(0).unwrap().text("task"), Some("pay bills"));
    }

    #[test]
    fn failed_validation_does_not_save() {
        let tmp = TempDir::new().unwrap();
        let mut book = open_json(tmp.path());
        assert!(matches!(
            book.add(&todo("")),
            Err(BookError::List(ListError::Validation(_)))
        ));
        assert!(!tmp.path().join("todos.json").exists());
    }

    #[test]
    fn corrupt_store_falls_back_to_empty_and_is_recoverable() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("todos.json"), "[{\"task\": ").unwrap();
        let book = open_json(tmp.path());
        assert!(book.is_empty());

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Load);
        assert_eq!(entries[0].body, "[{\"task\": ");
    }

    #[test]
    fn wrong_shape_falls_back_to_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("todos.json"), "{\"task\": \"x\"}").unwrap();
        assert!(open_json(tmp.path()).is_empty());
    }

    #[test]
    fn stray_values_in_stored_rows_are_defaulted() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("todos.json"),
            r#"[{"task":"buy milk","completed":null},{"task":"pay bills","completed":true,"priority":1}]"#,
        )
        .unwrap();
        let book = open_json(tmp.path());
        assert_eq!(
            book.list().records(),
            &[
                Record::new().with("task", "buy milk").with("completed", false),
                Record::new().with("task", "pay bills").with("completed", true),
            ]
        );
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
    }

    #[test]
    fn failed_save_keeps_change_in_memory() {
        let tmp = TempDir::new().unwrap();
        let mut book = open_json(tmp.path());
        book.add(&todo("kept")).unwrap();

        // Replace the store file's directory entry with a directory so the rename fails
        fs::remove_file(tmp.path().join("todos.json")).unwrap();
        fs::create_dir(tmp.path().join("todos.json")).unwrap();

        let result = book.add(&todo("unsaved"));
        assert!(matches!(result, Err(BookError::Persistence(_))));
        assert_eq!(book.len(), 2);

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert!(entries[0].body.contains("unsaved"));
    }

    #[test]
    fn in_memory_book() {
        let mut book = Book::in_memory(Schema::contacts());
        assert!(!book.is_persistent());
        book.add(&Record::new().with("name", "Alice")).unwrap();
        assert_eq!(book.len(), 1);
        assert!(matches!(
            book.delete(4),
            Err(BookError::List(ListError::NotFound { position: 4, len: 1 }))
        ));
    }
}
