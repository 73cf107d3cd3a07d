use serde::Serialize;

use crate::model::record::{FieldValue, Record};
use crate::model::schema::{FieldKind, Schema};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RecordJson<'a> {
    /// 0-based position in the list
    pub position: usize,
    /// 1-based number as printed by `rb list`
    pub number: usize,
    pub record: &'a Record,
}

#[derive(Serialize)]
pub struct RecordListJson<'a> {
    pub book: &'a str,
    /// True when `records` is a search subset
    pub filtered: bool,
    pub total: usize,
    pub records: Vec<RecordJson<'a>>,
}

#[derive(Serialize)]
pub struct MutationJson<'a> {
    pub action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<&'a Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
    pub saved: bool,
}

pub fn record_json(position: usize, record: &Record) -> RecordJson<'_> {
    RecordJson {
        position,
        number: position + 1,
        record,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Serial number as displayed to the user: position 0 is `01`
pub fn format_serial(position: usize) -> String {
    format!("{:02}", position + 1)
}

/// Resolve a displayed number back into a position. `0` has no position.
pub fn number_to_position(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

fn checkbox(value: bool) -> &'static str {
    if value { "[x]" } else { "[ ]" }
}

/// One-line summary: serial, flag boxes, main field, then other non-empty text fields
pub fn format_record_line(schema: &Schema, position: usize, record: &Record) -> String {
    let mut parts = vec![format_serial(position)];
    for def in schema.fields().iter().filter(|f| f.kind == FieldKind::Flag) {
        parts.push(checkbox(record.flag(&def.name).unwrap_or(false)).to_string());
    }

    let primary = schema.primary_field().map(|f| f.name.as_str());
    let mut texts: Vec<&str> = Vec::new();
    if let Some(text) = primary.and_then(|p| record.text(p)) {
        texts.push(text);
    }
    for def in schema.text_fields() {
        if Some(def.name.as_str()) == primary {
            continue;
        }
        if let Some(text) = record.text(&def.name)
            && !text.is_empty()
        {
            texts.push(text);
        }
    }
    parts.push(texts.join(" | "));
    parts.join(" ")
}

/// `field: value` for every field in schema order
pub fn format_record_detail(schema: &Schema, position: usize, record: &Record) -> Vec<String> {
    let mut lines = vec![format!("#{}", format_serial(position))];
    let width = schema
        .fields()
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0);
    for def in schema.fields() {
        let value = match record.get(&def.name) {
            Some(FieldValue::Flag(b)) => checkbox(*b).to_string(),
            Some(FieldValue::Text(s)) => s.clone(),
            None => String::new(),
        };
        lines.push(format!("{:width$}  {}", def.name, value, width = width));
    }
    lines
}

/// Lines for a list or a search subset
pub fn format_listing<'a>(
    schema: &Schema,
    rows: impl Iterator<Item = (usize, &'a Record)>,
) -> Vec<String> {
    rows.map(|(i, r)| format_record_line(schema, i, r)).collect()
}
