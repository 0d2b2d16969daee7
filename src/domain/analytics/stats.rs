use serde::{Deserialize, Serialize};

/// A name with its tally, as used by the top-author and top-genre lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: u64,
}

/// Completed books and pages for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// Month label such as "Jan 2024".
    pub month: String,
    pub books: u64,
    pub pages: u64,
}

/// One bar of the reading-time histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBucket {
    /// Day range label such as "8-14 days".
    pub range: String,
    pub value: u64,
}

/// Every derived reading statistic for one library snapshot.
///
/// Decimal figures are pre-formatted to one decimal place so the bundle
/// compares and serializes identically across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsBundle {
    pub total_books: u64,
    pub total_pages: u64,
    pub avg_pages_per_book: u64,
    pub total_reading_days: u64,
    /// Pages per reading day.
    pub reading_speed: String,
    pub total_reading_time_hours: String,
    /// Mean days per book over books with a reading-time signal; "0" when
    /// there are none.
    pub average_reading_time: String,
    pub has_reading_time_data: bool,
    pub books_this_month: u64,
    pub books_this_year: u64,
    pub monthly_goal_progress: u32,
    pub yearly_goal_progress: u32,
    pub reading_books: u64,
    pub to_read_books: u64,
    pub purchased_books: u64,
    pub to_buy_books: u64,
    pub reading_speed_pages_per_hour: u32,
    pub yearly_goal: u32,
    pub monthly_goal: u32,
    pub top_authors: Vec<RankedEntry>,
    pub top_genres: Vec<RankedEntry>,
    pub monthly: Vec<MonthlyBucket>,
    pub reading_time_distribution: Vec<DistributionBucket>,
}
