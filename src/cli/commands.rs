use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "rb", about = concat!("recordbook v", env!("CARGO_PKG_VERSION"), " - to-do lists and contact books"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different book directory
    #[arg(short = 'C', long = "book-dir", global = true)]
    pub book_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new book in the current directory
    Init(InitArgs),
    /// List all records
    List,
    /// Show one record
    Show(ShowArgs),
    /// Add a record
    Add(AddArgs),
    /// Change fields of a record
    Update(UpdateArgs),
    /// Delete a record
    Delete(DeleteArgs),
    /// Flip a flag field (e.g. mark a task complete)
    Toggle(ToggleArgs),
    /// List records whose searchable fields contain the query
    Search(SearchArgs),
    /// Remove every record whose flag is set (e.g. clear completed)
    Clear(ClearArgs),
    /// Show data the store could not keep
    Recovery(RecoveryArgs),
}

/// Built-in field sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Todo,
    Contacts,
}

#[derive(Args)]
pub struct InitArgs {
    /// Book name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Field set to use
    #[arg(long, value_enum, default_value = "todo")]
    pub kind: KindArg,
    /// Keep records in memory only (nothing is written between runs)
    #[arg(long)]
    pub memory: bool,
    /// Overwrite an existing book.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Record number as shown by `rb list`
    pub number: usize,
}

#[derive(Args)]
pub struct AddArgs {
    /// Value for the main field (task text, contact name)
    pub text: Option<String>,
    /// Set a field: --set phone=555-0100 (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Record number as shown by `rb list`
    pub number: usize,
    /// New value for the main field
    pub text: Option<String>,
    /// Set a field: --set email=a@b.c (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Record number as shown by `rb list`
    pub number: usize,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Record number as shown by `rb list`
    pub number: usize,
    /// Flag field to flip (default: the first flag field)
    #[arg(long)]
    pub flag: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Flag field to clear by (default: the first flag field)
    #[arg(long)]
    pub flag: Option<String>,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show only the most recent N entries
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Parse `field=value`
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got \"{}\"", s))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in \"{}\"", s));
    }
    Ok((field.to_string(), value.to_string()))
}
