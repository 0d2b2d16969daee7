use chrono::Datelike;

use super::records::{BookRecord, ReadingStatus};

/// A library split by reading status, borrowing the caller's records.
#[derive(Debug, Clone, Default)]
pub struct Shelves<'a> {
    pub completed: Vec<&'a BookRecord>,
    pub reading: Vec<&'a BookRecord>,
    pub to_read: Vec<&'a BookRecord>,
}

impl<'a> Shelves<'a> {
    pub fn partition(books: &'a [BookRecord]) -> Self {
        let mut shelves = Shelves::default();
        for book in books {
            match book.status {
                ReadingStatus::Completed => shelves.completed.push(book),
                ReadingStatus::Reading => shelves.reading.push(book),
                ReadingStatus::ToRead => shelves.to_read.push(book),
            }
        }
        shelves
    }

    /// Restrict the completed shelf to books finished in `year`. Books whose
    /// completion date is missing or unparseable drop out when a year is set.
    /// The reading and to-read shelves are never filtered.
    pub fn with_completed_in_year(mut self, year: Option<i32>) -> Self {
        if let Some(year) = year {
            self.completed
                .retain(|book| book.completed_on().date().is_some_and(|d| d.year() == year));
        }
        self
    }
}

/// Distinct completion years across completed books, newest first.
pub fn available_years(books: &[BookRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = books
        .iter()
        .filter(|book| book.status == ReadingStatus::Completed)
        .filter_map(|book| book.completed_on().date())
        .map(|date| date.year())
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
