//! Derives every reading statistic from a library snapshot in one pass.
//!
//! All functions here are pure: the evaluation date and the user's
//! preferences come in as arguments and nothing is cached. Malformed records
//! drop out of the aggregates that need the malformed field and nowhere else.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use super::stats::{DistributionBucket, MonthlyBucket, RankedEntry, StatsBundle};
use crate::domain::books::{BookRecord, DateField, Shelves};
use crate::domain::dates::inclusive_reading_days;
use crate::domain::formatting::format_one_decimal;
use crate::domain::preferences::{PurchaseScope, ReadingPreferences};

/// Length of the top-author and top-genre lists.
pub const TOP_K: usize = 5;
/// Number of most recent months with completions kept in the monthly series.
pub const MONTHLY_WINDOW: usize = 6;
/// Reading days assumed for a completed book with a completion date only.
pub const FALLBACK_READING_DAYS: u32 = 14;

const DISTRIBUTION_BUCKETS: [(&str, u32, u32); 4] = [
    ("1-7 days", 0, 7),
    ("8-14 days", 8, 14),
    ("15-30 days", 15, 30),
    ("31+ days", 31, u32::MAX),
];

/// Everything the engine reads: the three status shelves and the user's
/// preferences.
#[derive(Debug, Clone, Copy)]
pub struct StatsInput<'a> {
    pub completed: &'a [&'a BookRecord],
    pub reading: &'a [&'a BookRecord],
    pub to_read: &'a [&'a BookRecord],
    pub preferences: ReadingPreferences,
}

impl<'a> StatsInput<'a> {
    pub fn from_shelves(shelves: &'a Shelves<'a>, preferences: ReadingPreferences) -> Self {
        Self {
            completed: &shelves.completed,
            reading: &shelves.reading,
            to_read: &shelves.to_read,
            preferences,
        }
    }
}

/// A completed book with its dates parsed once.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletedBook<'a> {
    pub book: &'a BookRecord,
    pub completed_on: Option<NaiveDate>,
    /// Duration from an explicit override or a parseable date pair.
    pub signal_days: Option<u32>,
}

impl<'a> CompletedBook<'a> {
    fn resolve(book: &'a BookRecord) -> Self {
        let completed = book.completed_on();
        let started = book.started_on();
        if completed == DateField::Malformed {
            warn!(
                book_id = %book.id,
                value = book.completion_date.as_deref().unwrap_or_default(),
                "unparseable completion date, excluding book from date-based stats"
            );
        }
        if started == DateField::Malformed {
            warn!(
                book_id = %book.id,
                value = book.start_reading_date.as_deref().unwrap_or_default(),
                "unparseable start date, ignoring it"
            );
        }

        let completed_on = completed.date();
        let date_pair_days = match (started.date(), completed_on) {
            (Some(start), Some(end)) => Some(inclusive_reading_days(start, end)),
            _ => None,
        };

        Self {
            book,
            completed_on,
            signal_days: book.reading_time_days.or(date_pair_days),
        }
    }

    /// Days counted toward the reading-day total, including the fallback for
    /// books that only carry a completion date.
    fn total_days_contribution(&self) -> u32 {
        match (self.signal_days, self.completed_on) {
            (Some(days), _) => days,
            (None, Some(_)) => FALLBACK_READING_DAYS,
            (None, None) => 0,
        }
    }
}

/// Compute the full statistics bundle for `input` as of `today`.
pub fn compute_statistics(input: &StatsInput<'_>, today: NaiveDate) -> StatsBundle {
    let completed: Vec<CompletedBook<'_>> = input
        .completed
        .iter()
        .map(|book| CompletedBook::resolve(book))
        .collect();
    let preferences = input.preferences;

    let total_books = completed.len() as u64;
    let total_pages = total_pages(input.completed);
    let total_reading_days = total_reading_days(&completed);

    let books_this_year = count_completed_in(&completed, |d| d.year() == today.year());
    let books_this_month = count_completed_in(&completed, |d| {
        d.year() == today.year() && d.month() == today.month()
    });

    let (purchased_books, to_buy_books) = purchase_counts(input);
    let reading_time_distribution = reading_time_distribution(&completed);

    debug!(
        completed = total_books,
        reading = input.reading.len(),
        to_read = input.to_read.len(),
        "statistics computed"
    );

    StatsBundle {
        total_books,
        total_pages,
        avg_pages_per_book: average_pages(total_pages, total_books),
        total_reading_days,
        reading_speed: pages_per_day(total_pages, total_reading_days),
        total_reading_time_hours: reading_hours(total_pages, preferences.reading_speed),
        average_reading_time: average_reading_time(&completed),
        has_reading_time_data: !reading_time_distribution.is_empty(),
        books_this_month,
        books_this_year,
        monthly_goal_progress: goal_progress(books_this_month, preferences.goals.monthly_goal),
        yearly_goal_progress: goal_progress(books_this_year, preferences.goals.yearly_goal),
        reading_books: input.reading.len() as u64,
        to_read_books: input.to_read.len() as u64,
        purchased_books,
        to_buy_books,
        reading_speed_pages_per_hour: preferences.reading_speed,
        yearly_goal: preferences.goals.yearly_goal,
        monthly_goal: preferences.goals.monthly_goal,
        top_authors: top_authors(input.completed),
        top_genres: top_genres(input.completed),
        monthly: monthly_series(&completed),
        reading_time_distribution,
    }
}

/// Partition a flat library, apply the optional completion-year filter and
/// compute its statistics.
pub fn compute_library_statistics(
    books: &[BookRecord],
    preferences: ReadingPreferences,
    year: Option<i32>,
    today: NaiveDate,
) -> StatsBundle {
    let shelves = Shelves::partition(books).with_completed_in_year(year);
    compute_statistics(&StatsInput::from_shelves(&shelves, preferences), today)
}

pub fn total_pages(books: &[&BookRecord]) -> u64 {
    books.iter().map(|book| book.page_count()).sum()
}

fn average_pages(total_pages: u64, total_books: u64) -> u64 {
    if total_books == 0 {
        return 0;
    }
    (total_pages as f64 / total_books as f64).round() as u64
}

fn total_reading_days(completed: &[CompletedBook<'_>]) -> u64 {
    completed
        .iter()
        .map(|book| u64::from(book.total_days_contribution()))
        .sum()
}

fn pages_per_day(total_pages: u64, total_reading_days: u64) -> String {
    format_one_decimal(total_pages as f64 / total_reading_days.max(1) as f64)
}

fn reading_hours(total_pages: u64, pages_per_hour: u32) -> String {
    format_one_decimal(total_pages as f64 / f64::from(pages_per_hour.max(1)))
}

fn average_reading_time(completed: &[CompletedBook<'_>]) -> String {
    let (sum, count) = completed
        .iter()
        .filter_map(|book| book.signal_days)
        .fold((0u64, 0u64), |(sum, count), days| {
            (sum + u64::from(days), count + 1)
        });
    if count == 0 {
        return "0".to_string();
    }
    format_one_decimal(sum as f64 / count as f64)
}

fn count_completed_in(
    completed: &[CompletedBook<'_>],
    in_period: impl Fn(NaiveDate) -> bool,
) -> u64 {
    completed
        .iter()
        .filter_map(|book| book.completed_on)
        .filter(|date| in_period(*date))
        .count() as u64
}

/// Percentage of `goal` reached, rounded and capped at 100.
pub fn goal_progress(count: u64, goal: u32) -> u32 {
    let percent = (count as f64 * 100.0 / f64::from(goal.max(1))).round();
    percent.min(100.0) as u32
}

fn purchase_counts(input: &StatsInput<'_>) -> (u64, u64) {
    let to_buy = input
        .to_read
        .iter()
        .filter(|book| book.purchased == Some(false))
        .count() as u64;
    let purchased_to_read = input
        .to_read
        .iter()
        .filter(|book| book.purchased == Some(true))
        .count() as u64;
    let purchased = match input.preferences.purchase_scope {
        PurchaseScope::ToRead => purchased_to_read,
        PurchaseScope::AllShelves => {
            purchased_to_read + input.reading.len() as u64 + input.completed.len() as u64
        }
    };
    (purchased, to_buy)
}

fn monthly_series(completed: &[CompletedBook<'_>]) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<(i32, u32), MonthlyBucket> = BTreeMap::new();
    for book in completed {
        let Some(date) = book.completed_on else {
            continue;
        };
        let bucket = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlyBucket {
                month: date.format("%b %Y").to_string(),
                books: 0,
                pages: 0,
            });
        bucket.books += 1;
        bucket.pages += book.book.page_count();
    }

    let skip = months.len().saturating_sub(MONTHLY_WINDOW);
    months.into_values().skip(skip).collect()
}

pub fn top_authors(completed: &[&BookRecord]) -> Vec<RankedEntry> {
    rank_top(
        completed
            .iter()
            .flat_map(|book| book.author_names().iter().map(String::as_str)),
        TOP_K,
    )
}

pub fn top_genres(completed: &[&BookRecord]) -> Vec<RankedEntry> {
    rank_top(
        completed
            .iter()
            .flat_map(|book| book.subjects.iter().map(String::as_str)),
        TOP_K,
    )
}

/// Tally exact-string names and keep the `limit` most frequent. Ties keep
/// the order in which names were first seen.
fn rank_top<'a>(names: impl Iterator<Item = &'a str>, limit: usize) -> Vec<RankedEntry> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut tally: Vec<RankedEntry> = Vec::new();
    for name in names {
        if let Some(&position) = index.get(name) {
            tally[position].count += 1;
        } else {
            index.insert(name, tally.len());
            tally.push(RankedEntry {
                name: name.to_string(),
                count: 1,
            });
        }
    }
    // Stable sort: equal counts stay in first-seen order.
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(limit);
    tally
}

fn reading_time_distribution(completed: &[CompletedBook<'_>]) -> Vec<DistributionBucket> {
    let mut counts = [0u64; DISTRIBUTION_BUCKETS.len()];
    let mut any = false;
    for days in completed.iter().filter_map(|book| book.signal_days) {
        if let Some(slot) = DISTRIBUTION_BUCKETS
            .iter()
            .position(|&(_, low, high)| (low..=high).contains(&days))
        {
            counts[slot] += 1;
            any = true;
        }
    }
    if !any {
        return Vec::new();
    }
    DISTRIBUTION_BUCKETS
        .iter()
        .zip(counts)
        .map(|(&(range, _, _), value)| DistributionBucket {
            range: range.to_string(),
            value,
        })
        .collect()
}
