use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{FieldValue, Record};

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Flag,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Flag => write!(f, "flag"),
        }
    }
}

impl FieldKind {
    pub fn default_value(self) -> FieldValue {
        match self {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Flag => FieldValue::Flag(false),
        }
    }
}

/// One field of a schema (`[[fields]]` in book.toml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Text must be non-empty for a record to be accepted
    #[serde(default)]
    pub required: bool,
    /// Included in substring search
    #[serde(default)]
    pub searchable: bool,
}

impl FieldDef {
    pub fn text(name: &str) -> Self {
        FieldDef {
            name: name.to_string(),
            kind: FieldKind::Text,
            required: false,
            searchable: false,
        }
    }

    pub fn flag(name: &str) -> Self {
        FieldDef {
            kind: FieldKind::Flag,
            ..FieldDef::text(name)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }
}

/// A record that does not fit the schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(String),
    #[error("unknown field \"{0}\"")]
    Unknown(String),
    #[error("field \"{field}\" holds {expected} values")]
    WrongKind { field: String, expected: FieldKind },
}

/// A schema definition that cannot be used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema defines no fields")]
    Empty,
    #[error("field name cannot be empty")]
    EmptyName,
    #[error("duplicate field \"{0}\"")]
    Duplicate(String),
    #[error("flag field \"{0}\" cannot be required")]
    RequiredFlag(String),
}

/// The fixed field set of one list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// `task` (required text) + `completed` flag
    pub fn todo() -> Self {
        Schema {
            fields: vec![
                FieldDef::text("task").required().searchable(),
                FieldDef::flag("completed"),
            ],
        }
    }

    /// `name` (required), `phone`, `email`, `address`. Search covers name and phone.
    pub fn contacts() -> Self {
        Schema {
            fields: vec![
                FieldDef::text("name").required().searchable(),
                FieldDef::text("phone").searchable(),
                FieldDef::text("email"),
                FieldDef::text("address"),
            ],
        }
    }

    pub fn custom(fields: Vec<FieldDef>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::new();
        for def in &fields {
            if def.name.trim().is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !seen.insert(def.name.as_str()) {
                return Err(SchemaError::Duplicate(def.name.clone()));
            }
            if def.required && def.kind == FieldKind::Flag {
                return Err(SchemaError::RequiredFlag(def.name.clone()));
            }
        }
        Ok(Schema { fields })
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The field a bare text argument fills: first required text field, else first text field
    pub fn primary_field(&self) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.required && f.kind == FieldKind::Text)
            .or_else(|| self.fields.iter().find(|f| f.kind == FieldKind::Text))
    }

    pub fn first_flag(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.kind == FieldKind::Flag)
    }

    pub fn text_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Text)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.searchable && f.kind == FieldKind::Text)
    }

    /// A record with every field at its default
    pub fn blank_record(&self) -> Record {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.kind.default_value()))
            .collect()
    }

    /// Check one caller-supplied value against its field
    fn check_value(&self, name: &str, value: &FieldValue) -> Result<FieldValue, FieldError> {
        let def = self
            .field(name)
            .ok_or_else(|| FieldError::Unknown(name.to_string()))?;
        if value.kind() != def.kind {
            return Err(FieldError::WrongKind {
                field: name.to_string(),
                expected: def.kind,
            });
        }
        Ok(match value {
            FieldValue::Text(s) => FieldValue::Text(s.trim().to_string()),
            FieldValue::Flag(b) => FieldValue::Flag(*b),
        })
    }

    /// Conform caller values to the full field set: trims text, fills omitted
    /// fields with defaults, rejects unknown fields and kind mismatches.
    /// Does not check required fields (see [`Schema::validate`]).
    pub fn conform(&self, values: &Record) -> Result<Record, FieldError> {
        self.merge(&self.blank_record(), values)
    }

    /// Overlay `changes` onto a copy of `base`
    pub fn merge(&self, base: &Record, changes: &Record) -> Result<Record, FieldError> {
        let mut merged = self.conform_stored(base.clone());
        for (name, value) in changes.iter() {
            let value = self.check_value(name, value)?;
            merged.set(name, value);
        }
        Ok(merged)
    }

    /// Every required text field must be non-empty
    pub fn validate(&self, record: &Record) -> Result<(), FieldError> {
        for def in self.fields.iter().filter(|f| f.required) {
            let empty = record.text(&def.name).is_none_or(|s| s.trim().is_empty());
            if empty {
                return Err(FieldError::Required(def.name.clone()));
            }
        }
        Ok(())
    }

    /// Lenient conformance for records read back from a store: unknown fields
    /// and kind mismatches are dropped, missing fields defaulted. Required
    /// fields are not checked.
    pub fn conform_stored(&self, record: Record) -> Record {
        self.fields
            .iter()
            .map(|def| {
                let value = match record.get(&def.name) {
                    Some(v) if v.kind() == def.kind => v.clone(),
                    _ => def.kind.default_value(),
                };
                (def.name.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn conform_fills_defaults_in_schema_order() {
        let schema = Schema::todo();
        let record = schema
            .conform(&Record::new().with("task", "  buy milk "))
            .unwrap();
        assert_eq!(
            record,
            Record::new().with("task", "buy milk").with("completed", false)
        );
        let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["task", "completed"]);
    }

    #[test]
    fn conform_rejects_unknown_field() {
        let err = Schema::contacts()
            .conform(&Record::new().with("name", "Bob").with("twitter", "@bob"))
            .unwrap_err();
        assert_eq!(err, FieldError::Unknown("twitter".into()));
    }

    #[test]
    fn conform_rejects_wrong_kind() {
        let err = Schema::todo()
            .conform(&Record::new().with("completed", "yes"))
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::WrongKind {
                field: "completed".into(),
                expected: FieldKind::Flag
            }
        );
    }

    #[test]
    fn validate_requires_non_blank_text() {
        let schema = Schema::contacts();
        let blank = schema.conform(&Record::new().with("name", "   ")).unwrap();
        assert_eq!(
            schema.validate(&blank),
            Err(FieldError::Required("name".into()))
        );
        let ok = schema.conform(&Record::new().with("name", "Alice")).unwrap();
        assert!(schema.validate(&ok).is_ok());
    }

    #[test]
    fn conform_stored_is_lenient() {
        let schema = Schema::todo();
        let stored = Record::new()
            .with("completed", "not a bool")
            .with("priority", "high")
            .with("task", "");
        let record = schema.conform_stored(stored);
        assert_eq!(
            record,
            Record::new().with("task", "").with("completed", false)
        );
    }

    #[test]
    fn primary_and_flag_fields() {
        assert_eq!(Schema::todo().primary_field().unwrap().name, "task");
        assert_eq!(Schema::todo().first_flag().unwrap().name, "completed");
        assert_eq!(Schema::contacts().primary_field().unwrap().name, "name");
        assert!(Schema::contacts().first_flag().is_none());
        let contacts = Schema::contacts();
        let searchable: Vec<&str> = contacts
            .searchable_fields()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(searchable, vec!["name", "phone"]);
    }

    #[test]
    fn custom_schema_checks() {
        assert_eq!(Schema::custom(vec![]), Err(SchemaError::Empty));
        assert_eq!(
            Schema::custom(vec![FieldDef::text("a"), FieldDef::text("a")]),
            Err(SchemaError::Duplicate("a".into()))
        );
        assert_eq!(
            Schema::custom(vec![FieldDef::flag("done").required()]),
            Err(SchemaError::RequiredFlag("done".into()))
        );
        let schema =
            Schema::custom(vec![FieldDef::text("title").required(), FieldDef::flag("read")])
                .unwrap();
        assert_eq!(schema.fields().len(), 2);
    }
}
