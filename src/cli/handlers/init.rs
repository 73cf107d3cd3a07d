use std::path::Path;

use crate::cli::commands::{InitArgs, KindArg};
use crate::io::book_io::{self, BOOK_DIR, CONFIG_FILE};

const BOOK_TOML_TEMPLATE: &str = r##"[book]
name = {name}
# "todo" (task + completed), "contacts" (name, phone, email, address),
# or "custom" with [[fields]] entries below.
kind = "{kind}"

{store}

# --- Custom fields (kind = "custom") ---
#
# [[fields]]
# name = "title"
# kind = "text"          # "text" or "flag"
# required = true
# searchable = true

[ui]
# Ask before deleting or clearing records in the TUI
confirm_delete = true

# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#7D78BF"
# green = "#44FF88"
# red = "#FF4444"
"##;

const STORE_SECTION: &str = "[store]\n# Rewritten in full after every change\nfile = \"records.json\"";

const MEMORY_STORE_SECTION: &str = "\
# No [store] table: records live in memory for a single session.
# [store]
# file = \"records.json\"";

/// Infer a book name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_book_toml(name: &str, kind: KindArg, memory: bool) -> String {
    let kind = match kind {
        KindArg::Todo => "todo",
        KindArg::Contacts => "contacts",
    };
    let store = if memory {
        MEMORY_STORE_SECTION
    } else {
        STORE_SECTION
    };
    BOOK_TOML_TEMPLATE
        .replace("{name}", &toml::Value::String(name.to_string()).to_string())
        .replace("{kind}", kind)
        .replace("{store}", store)
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let book_dir = dir.join(BOOK_DIR);
    if book_dir.join(CONFIG_FILE).exists() && !args.force {
        return Err(format!(
            "a book already exists in {}/ (use --force to overwrite its config)",
            book_dir.display()
        )
        .into());
    }

    if let Some(parent) = dir.parent()
        && let Ok(parent_root) = book_io::discover_book(parent)
    {
        eprintln!(
            "note: parent book found at {}/",
            parent_root.join(BOOK_DIR).display()
        );
    }

    let name = args.name.unwrap_or_else(|| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Records".to_string())
    });

    std::fs::create_dir_all(&book_dir)?;
    let content = render_book_toml(&name, args.kind, args.memory);
    crate::io::recovery::atomic_write(&book_dir.join(CONFIG_FILE), content.as_bytes())?;

    // Validate what was written
    book_io::read_config(&book_dir)?;

    println!("Initialized {} in {}/", name, book_dir.display());
    Ok(())
}
