use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Cursor row in the unfiltered list
    #[serde(default)]
    pub cursor: usize,
    /// Search that was active at exit
    #[serde(default)]
    pub last_search: Option<String>,
}

/// Read .state.json from the book directory
pub fn read_ui_state(book_dir: &Path) -> Option<UiState> {
    let path = book_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the book directory
pub fn write_ui_state(book_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = book_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
