use std::ops::Range;

use regex::Regex;

use crate::model::record::Record;
use crate::model::schema::Schema;
use crate::ops::record_list::RecordList;

/// Case-insensitive substring match over the schema's searchable fields.
/// An empty (or all-whitespace) query matches every record.
pub fn substring_predicate(schema: &Schema, query: &str) -> impl Fn(&Record) -> bool + use<> {
    let needle = query.trim().to_lowercase();
    let fields: Vec<String> = schema
        .searchable_fields()
        .map(|f| f.name.clone())
        .collect();
    move |record: &Record| {
        needle.is_empty()
            || fields.iter().any(|name| {
                record
                    .text(name)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
    }
}

/// Records whose `flag` field is set
pub fn flag_predicate(flag: &str) -> impl Fn(&Record) -> bool + use<> {
    let flag = flag.to_string();
    move |record: &Record| record.flag(&flag) == Some(true)
}

/// Positions of records matching `query`, in list order
pub fn search_positions(list: &RecordList, query: &str) -> Vec<usize> {
    list.find(substring_predicate(list.schema(), query))
        .map(|(i, _)| i)
        .collect()
}

/// Compile a query into a case-insensitive literal matcher for highlighting
pub fn highlight_regex(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(query))).ok()
}

/// All non-overlapping match byte-ranges of `re` in `text`
pub fn match_spans(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}
