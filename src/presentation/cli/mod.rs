pub mod library;
pub mod report;
pub mod stats;

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::domain::books::BookRecord;
use crate::domain::preferences::PurchaseScope;
use library::LibraryCommands;
use stats::StatsCommand;

#[derive(Debug, Parser)]
#[command(author, version, about = "Aggregate reading statistics for a book library", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "READLOG_URL",
        default_value = "http://localhost:3000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Compute statistics for a local books file
    Stats(StatsCommand),

    /// Manage libraries stored on a running server
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(long, env = "READLOG_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    /// Delay before warming stats after a library write
    #[arg(long, env = "READLOG_STATS_DEBOUNCE_MS", default_value_t = 500)]
    pub stats_debounce_ms: u64,
}

/// Output format shared by the stats commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Preference overrides shared by `stats` and `library preferences`.
#[derive(Debug, Args)]
pub struct PreferenceArgs {
    /// Pages read per hour
    #[arg(long)]
    pub reading_speed: Option<u32>,
    #[arg(long)]
    pub yearly_goal: Option<u32>,
    #[arg(long)]
    pub monthly_goal: Option<u32>,
    /// Which shelves count towards purchased books (to-read or all-shelves)
    #[arg(long, value_parser = parse_purchase_scope)]
    pub purchase_scope: Option<PurchaseScope>,
}

pub fn parse_purchase_scope(value: &str) -> Result<PurchaseScope, String> {
    value
        .parse()
        .map_err(|()| format!("invalid purchase scope '{value}': expected to-read or all-shelves"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BooksFile {
    List(Vec<BookRecord>),
    Wrapped { books: Vec<BookRecord> },
}

/// Read book records from a JSON file holding either an array of records or
/// an object with a `books` array.
pub fn load_books_file(path: &Path) -> anyhow::Result<Vec<BookRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_books(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_books(contents: &str) -> anyhow::Result<Vec<BookRecord>> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    if !(value.is_array() || value.get("books").is_some()) {
        bail!("expected a JSON array of books or an object with a `books` array");
    }
    Ok(match serde_json::from_value(value)? {
        BooksFile::List(books) | BooksFile::Wrapped { books } => books,
    })
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
