use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};

use super::report::render_text;
use super::{OutputFormat, PreferenceArgs, load_books_file, print_json};
use crate::domain::ids::LibraryId;
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum LibraryCommands {
    /// List stored libraries
    List,
    /// Replace a library's books with the contents of a file
    Push(PushCommand),
    /// Show a library's stored books
    Books(LibraryIdArg),
    /// Show or update a library's reading preferences
    Preferences(PreferencesCommand),
    /// Show a library's statistics
    Stats(LibraryStatsCommand),
    /// List the years in which books were completed
    Years(LibraryIdArg),
    /// Delete a library
    Delete(LibraryIdArg),
}

pub async fn run(client: &ReadlogClient, cmd: LibraryCommands) -> Result<()> {
    match cmd {
        LibraryCommands::List => list_libraries(client).await,
        LibraryCommands::Push(c) => push_books(client, c).await,
        LibraryCommands::Books(c) => show_books(client, c).await,
        LibraryCommands::Preferences(c) => preferences(client, c).await,
        LibraryCommands::Stats(c) => library_stats(client, c).await,
        LibraryCommands::Years(c) => library_years(client, c).await,
        LibraryCommands::Delete(c) => delete_library(client, c).await,
    }
}

fn parse_library_id(value: &str) -> Result<LibraryId, String> {
    LibraryId::parse(value).ok_or_else(|| {
        format!("invalid library id '{value}': use 1-64 letters, digits, '-' or '_'")
    })
}

#[derive(Debug, Args)]
pub struct LibraryIdArg {
    #[arg(long, value_parser = parse_library_id)]
    pub id: LibraryId,
}

#[derive(Debug, Args)]
pub struct PushCommand {
    #[arg(long, value_parser = parse_library_id)]
    pub id: LibraryId,
    /// JSON file with book records
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct PreferencesCommand {
    #[arg(long, value_parser = parse_library_id)]
    pub id: LibraryId,
    #[command(flatten)]
    pub overrides: PreferenceArgs,
}

#[derive(Debug, Args)]
pub struct LibraryStatsCommand {
    #[arg(long, value_parser = parse_library_id)]
    pub id: LibraryId,
    #[arg(long, value_parser = clap::value_parser!(i32).range(1900..=2200))]
    pub year: Option<i32>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

pub async fn list_libraries(client: &ReadlogClient) -> Result<()> {
    let ids = client.libraries().list().await?;
    print_json(&ids)
}

pub async fn push_books(client: &ReadlogClient, command: PushCommand) -> Result<()> {
    let books = load_books_file(&command.file)?;
    let summary = client.libraries().push_books(&command.id, &books).await?;
    print_json(&summary)
}

pub async fn show_books(client: &ReadlogClient, command: LibraryIdArg) -> Result<()> {
    let books = client.libraries().books(&command.id).await?;
    print_json(&books)
}

/// Without overrides this prints the stored preferences; with any override
/// it merges them onto the stored (or default) values and saves the result.
pub async fn preferences(client: &ReadlogClient, command: PreferencesCommand) -> Result<()> {
    let o = &command.overrides;
    let has_overrides = o.reading_speed.is_some()
        || o.yearly_goal.is_some()
        || o.monthly_goal.is_some()
        || o.purchase_scope.is_some();

    let libraries = client.libraries();
    if !has_overrides {
        let current = libraries.preferences(&command.id).await?;
        return print_json(&current);
    }

    let current = libraries
        .find_preferences(&command.id)
        .await?
        .unwrap_or_default();
    let updated =
        current.with_overrides(o.reading_speed, o.yearly_goal, o.monthly_goal, o.purchase_scope);
    updated.validate().map_err(|err| anyhow!("{err}"))?;

    let saved = libraries.set_preferences(&command.id, &updated).await?;
    print_json(&saved)
}

pub async fn library_stats(client: &ReadlogClient, command: LibraryStatsCommand) -> Result<()> {
    let cached = client.libraries().stats(&command.id, command.year).await?;
    match command.format {
        OutputFormat::Json => print_json(&cached),
        OutputFormat::Text => {
            print!("{}", render_text(&cached.stats, cached.year));
            Ok(())
        }
    }
}

pub async fn library_years(client: &ReadlogClient, command: LibraryIdArg) -> Result<()> {
    let years = client.libraries().years(&command.id).await?;
    print_json(&years)
}

pub async fn delete_library(client: &ReadlogClient, command: LibraryIdArg) -> Result<()> {
    client.libraries().delete(&command.id).await?;
    eprintln!("Deleted library {}.", command.id);
    Ok(())
}
