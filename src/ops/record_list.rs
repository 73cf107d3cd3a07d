use crate::model::record::{FieldValue, Record};
use crate::model::schema::{FieldError, FieldKind, Schema};

/// Error type for record list operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("invalid record: {0}")]
    Validation(#[from] FieldError),
    #[error("no record at position {position} (list has {len})")]
    NotFound { position: usize, len: usize },
}

/// An ordered list of records sharing one schema.
///
/// A record's position is its only identity. Deleting shifts every later
/// record down by one, so a position obtained before a mutation must be
/// re-resolved against the live list before it is used again.
#[derive(Debug, Clone)]
pub struct RecordList {
    schema: Schema,
    records: Vec<Record>,
}

impl RecordList {
    pub fn new(schema: Schema) -> Self {
        RecordList {
            schema,
            records: Vec::new(),
        }
    }

    /// Build a list from stored records, conforming each to the schema
    pub fn from_stored(schema: Schema, records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .map(|r| schema.conform_stored(r))
            .collect();
        RecordList { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.records.iter().enumerate()
    }

    /// Check a position against the current list
    pub fn resolve(&self, position: usize) -> Result<usize, ListError> {
        if position < self.records.len() {
            Ok(position)
        } else {
            Err(ListError::NotFound {
                position,
                len: self.records.len(),
            })
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a record. Returns its position (`len - 1`).
    pub fn add(&mut self, values: &Record) -> Result<usize, ListError> {
        let record = self.schema.conform(values)?;
        self.schema.validate(&record)?;
        self.records.push(record);
        Ok(self.records.len() - 1)
    }

    /// Merge `changes` into the record at `position`. Fields not named in
    /// `changes` keep their value; pass every field for a whole replace.
    pub fn update(&mut self, position: usize, changes: &Record) -> Result<(), ListError> {
        let position = self.resolve(position)?;
        let merged = self.schema.merge(&self.records[position], changes)?;
        self.schema.validate(&merged)?;
        self.records[position] = merged;
        Ok(())
    }

    /// Remove and return the record at `position`
    pub fn delete(&mut self, position: usize) -> Result<Record, ListError> {
        let position = self.resolve(position)?;
        Ok(self.records.remove(position))
    }

    /// Flip a flag field in place. Returns the new value.
    pub fn toggle_flag(&mut self, position: usize, flag: &str) -> Result<bool, ListError> {
        let position = self.resolve(position)?;
        match self.schema.field(flag) {
            None => return Err(FieldError::Unknown(flag.to_string()).into()),
            Some(def) if def.kind != FieldKind::Flag => {
                return Err(FieldError::WrongKind {
                    field: flag.to_string(),
                    expected: def.kind,
                }
                .into());
            }
            Some(_) => {}
        }
        let record = &mut self.records[position];
        let new_value = !record.flag(flag).unwrap_or(false);
        record.set(flag, FieldValue::Flag(new_value));
        Ok(new_value)
    }

    /// Remove every record matching `predicate`. Removal runs from the highest
    /// position down so earlier positions stay valid while removing. Returns
    /// the removed records in their original order.
    pub fn clear_where<P>(&mut self, predicate: P) -> Vec<Record>
    where
        P: Fn(&Record) -> bool,
    {
        let positions: Vec<usize> = self.find(&predicate).map(|(i, _)| i).collect();
        let mut removed = Vec::with_capacity(positions.len());
        for &position in positions.iter().rev() {
            removed.push(self.records.remove(position));
        }
        removed.reverse();
        removed
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Lazily yield `(position, record)` for records matching `predicate`, in
    /// list order. Each call starts over against the current list.
    pub fn find<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = (usize, &'a Record)> + 'a
    where
        P: Fn(&Record) -> bool + 'a,
    {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| predicate(r))
    }
}
