use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::schema::{FieldDef, Schema, SchemaError};

/// Configuration from book.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    pub book: BookInfo,
    /// Absent = memory-only book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,
    /// Field set for `kind = "custom"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInfo {
    pub name: String,
    #[serde(default)]
    pub kind: BookKind,
}

/// Which field set a book uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookKind {
    #[default]
    Todo,
    Contacts,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file, relative to the book directory
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

fn default_store_file() -> String {
    "records.json".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Ask before deleting or clearing records in the TUI
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            confirm_delete: true,
            colors: HashMap::new(),
        }
    }
}

impl BookConfig {
    pub fn new(name: &str, kind: BookKind, store: Option<StoreConfig>) -> Self {
        BookConfig {
            book: BookInfo {
                name: name.to_string(),
                kind,
            },
            store,
            fields: Vec::new(),
            ui: UiConfig::default(),
        }
    }

    /// Build the schema this config describes
    pub fn schema(&self) -> Result<Schema, SchemaError> {
        match self.book.kind {
            BookKind::Todo => Ok(Schema::todo()),
            BookKind::Contacts => Ok(Schema::contacts()),
            BookKind::Custom => Schema::custom(self.fields.clone()),
        }
    }
}
