use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Local;
use clap::Args;

use super::report::render_text;
use super::{OutputFormat, PreferenceArgs, load_books_file, print_json};
use crate::domain::calculator::compute_library_statistics;
use crate::domain::preferences::ReadingPreferences;

#[derive(Debug, Args)]
pub struct StatsCommand {
    /// JSON file with book records
    #[arg(long)]
    pub file: PathBuf,
    /// Only count books completed in this year
    #[arg(long, value_parser = clap::value_parser!(i32).range(1900..=2200))]
    pub year: Option<i32>,
    #[command(flatten)]
    pub preferences: PreferenceArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

pub fn run(command: StatsCommand) -> Result<()> {
    let books = load_books_file(&command.file)?;
    let prefs = &command.preferences;
    let preferences = ReadingPreferences::default().with_overrides(
        prefs.reading_speed,
        prefs.yearly_goal,
        prefs.monthly_goal,
        prefs.purchase_scope,
    );
    if let Err(err) = preferences.validate() {
        bail!("{err}");
    }

    let stats =
        compute_library_statistics(&books, preferences, command.year, Local::now().date_naive());

    match command.format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            print!("{}", render_text(&stats, command.year));
            Ok(())
        }
    }
}
