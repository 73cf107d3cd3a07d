mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::book_io::{self, BookIoError, OpenBook};
use crate::io::recovery;
use crate::model::record::{FieldValue, Record};
use crate::model::schema::{FieldKind, Schema};
use crate::ops::search;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Where a command runs and how it reports
struct Context {
    start: PathBuf,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let start = resolve_start_dir(cli.book_dir.as_deref())?;
    let ctx = Context {
        start,
        json: cli.json,
    };

    match cli.command {
        None => Err("no command given (run `rb` without arguments for the TUI)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, &ctx.start),

            // Read commands
            Commands::List => cmd_list(&ctx),
            Commands::Show(args) => cmd_show(&ctx, args),
            Commands::Search(args) => cmd_search(&ctx, args),
            Commands::Recovery(args) => cmd_recovery(&ctx, args),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args),
            Commands::Update(args) => cmd_update(&ctx, args),
            Commands::Delete(args) => cmd_delete(&ctx, args),
            Commands::Toggle(args) => cmd_toggle(&ctx, args),
            Commands::Clear(args) => cmd_clear(&ctx, args),
        },
    }
}

/// The `-C` directory, or the current directory
pub fn resolve_start_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_cwd(start: &Path) -> Result<OpenBook, BookIoError> {
    let root = book_io::discover_book(start)?;
    book_io::open_book(&root)
}

/// Resolve a displayed record number against the live list
fn resolve_number(open: &OpenBook, number: usize) -> Result<usize, Box<dyn std::error::Error>> {
    let position = number_to_position(number)
        .ok_or_else(|| "record numbers start at 1".to_string())?;
    Ok(open.book.list().resolve(position)?)
}

/// Parse a flag value typed on the command line
fn parse_flag(field: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "x" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        _ => Err(format!(
            "field \"{}\" is a flag; expected true or false, got \"{}\"",
            field, value
        )),
    }
}

/// Build caller values from a bare main-field value plus `--set` pairs.
/// Unknown field names pass through so validation can report them.
fn build_values(
    schema: &Schema,
    text: Option<String>,
    sets: Vec<(String, String)>,
) -> Result<Record, Box<dyn std::error::Error>> {
    let mut record = Record::new();
    if let Some(text) = text {
        let primary = schema
            .primary_field()
            .ok_or("this book has no text fields; use --set")?;
        record.set(&primary.name, text);
    }
    for (field, value) in sets {
        let value = match schema.field(&field).map(|f| f.kind) {
            Some(FieldKind::Flag) => FieldValue::Flag(parse_flag(&field, &value)?),
            _ => FieldValue::Text(value),
        };
        record.set(&field, value);
    }
    Ok(record)
}

/// The flag a toggle/clear acts on: the named one, or the schema's first flag
fn pick_flag(schema: &Schema, flag: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match flag {
        Some(f) => Ok(f),
        None => Ok(schema
            .first_flag()
            .map(|f| f.name.clone())
            .ok_or("this book has no flag fields")?),
    }
}

fn warn_if_ephemeral(open: &OpenBook) {
    if !open.book.is_persistent() {
        eprintln!("note: this book has no [store]; the change is discarded when rb exits");
    }
}

fn print_mutation(ctx: &Context, open: &OpenBook, mutation: MutationJson, message: String) -> CmdResult {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&mutation)?);
    } else {
        println!("{}", message);
        warn_if_ephemeral(open);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context) -> CmdResult {
    let open = open_cwd(&ctx.start)?;
    let list = open.book.list();

    if ctx.json {
        let out = RecordListJson {
            book: &open.config.book.name,
            filtered: false,
            total: list.len(),
            records: list.iter().map(|(i, r)| record_json(i, r)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if list.is_empty() {
        println!("(no records)");
    }
    for line in format_listing(list.schema(), list.iter()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> CmdResult {
    let open = open_cwd(&ctx.start)?;
    let position = resolve_number(&open, args.number)?;
    let list = open.book.list();
    let record = &list.records()[position];

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record_json(position, record))?
        );
    } else {
        for line in format_record_detail(list.schema(), position, record) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(ctx: &Context, args: SearchArgs) -> CmdResult {
    let open = open_cwd(&ctx.start)?;
    let list = open.book.list();
    let predicate = search::substring_predicate(list.schema(), &args.query);

    if ctx.json {
        let out = RecordListJson {
            book: &open.config.book.name,
            filtered: true,
            total: list.len(),
            records: list.find(predicate).map(|(i, r)| record_json(i, r)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let lines = format_listing(list.schema(), list.find(predicate));
    if lines.is_empty() {
        println!("no matches for \"{}\"", args.query);
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_recovery(ctx: &Context, args: RecoveryArgs) -> CmdResult {
    let root = book_io::discover_book(&ctx.start)?;
    let book_dir = root.join(book_io::BOOK_DIR);
    let entries = recovery::read_recovery_entries(&book_dir, args.limit);

    if ctx.json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("recovery log is empty");
    }
    for entry in &entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let mut open = open_cwd(&ctx.start)?;
    let values = build_values(open.book.schema(), args.text, args.set)?;
    let position = open.book.add(&values)?;
    let record = open.book.get(position).cloned();
    print_mutation(
        ctx,
        &open,
        MutationJson {
            action: "add",
            position: Some(position),
            record: record.as_ref(),
            removed: None,
            saved: open.book.is_persistent(),
        },
        format!("added {}", format_serial(position)),
    )
}

fn cmd_update(ctx: &Context, args: UpdateArgs) -> CmdResult {
    let mut open = open_cwd(&ctx.start)?;
    if args.text.is_none() && args.set.is_empty() {
        return Err("nothing to update: give new text or --set FIELD=VALUE".into());
    }
    let position = resolve_number(&open, args.number)?;
    let values = build_values(open.book.schema(), args.text, args.set)?;
    open.book.update(position, &values)?;
    let record = open.book.get(position).cloned();
    print_mutation(
        ctx,
        &open,
        MutationJson {
            action: "update",
            position: Some(position),
            record: record.as_ref(),
            removed: None,
            saved: open.book.is_persistent(),
        },
        format!("updated {}", format_serial(position)),
    )
}

fn cmd_delete(ctx: &Context, args: DeleteArgs) -> CmdResult {
    let mut open = open_cwd(&ctx.start)?;
    let position = resolve_number(&open, args.number)?;
    let removed = open.book.delete(position)?;
    print_mutation(
        ctx,
        &open,
        MutationJson {
            action: "delete",
            position: Some(position),
            record: Some(&removed),
            removed: Some(1),
            saved: open.book.is_persistent(),
        },
        format!("deleted {}", format_serial(position)),
    )
}

fn cmd_toggle(ctx: &Context, args: ToggleArgs) -> CmdResult {
    let mut open = open_cwd(&ctx.start)?;
    let flag = pick_flag(open.book.schema(), args.flag)?;
    let position = resolve_number(&open, args.number)?;
    let value = open.book.toggle_flag(position, &flag)?;
    let record = open.book.get(position).cloned();
    print_mutation(
        ctx,
        &open,
        MutationJson {
            action: "toggle",
            position: Some(position),
            record: record.as_ref(),
            removed: None,
            saved: open.book.is_persistent(),
        },
        format!("{} {} = {}", format_serial(position), flag, value),
    )
}

fn cmd_clear(ctx: &Context, args: ClearArgs) -> CmdResult {
    let mut open = open_cwd(&ctx.start)?;
    let flag = pick_flag(open.book.schema(), args.flag)?;
    if open.book.schema().field(&flag).map(|f| f.kind) != Some(FieldKind::Flag) {
        return Err(format!("\"{}\" is not a flag field", flag).into());
    }
    let removed = open.book.clear_where(search::flag_predicate(&flag))?;
    print_mutation(
        ctx,
        &open,
        MutationJson {
            action: "clear",
            position: None,
            record: None,
            removed: Some(removed.len()),
            saved: open.book.is_persistent(),
        },
        format!("cleared {} record(s) with {} set", removed.len(), flag),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("done", "Yes"), Ok(true));
        assert_eq!(parse_flag("done", "0"), Ok(false));
        assert!(parse_flag("done", "maybe").is_err());
    }

    #[test]
    fn test_build_values_uses_primary_field() {
        let values = build_values(
            &Schema::contacts(),
            Some("Alice".into()),
            vec![("phone".into(), "555".into())],
        )
        .unwrap();
        assert_eq!(values.text("name"), Some("Alice"));
        assert_eq!(values.text("phone"), Some("555"));
    }

    #[test]
    fn test_build_values_parses_flags() {
        let values = build_values(
            &Schema::todo(),
            Some("x".into()),
            vec![("completed".into(), "true".into())],
        )
        .unwrap();
        assert_eq!(values.flag("completed"), Some(true));
    }

    #[test]
    fn test_pick_flag_defaults_to_first() {
        assert_eq!(pick_flag(&Schema::todo(), None).unwrap(), "completed");
        assert!(pick_flag(&Schema::contacts(), None).is_err());
    }
}
