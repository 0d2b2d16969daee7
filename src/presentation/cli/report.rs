use std::fmt::Write as _;

use crate::domain::formatting::{format_days, format_number, format_pages, progress_bar};
use crate::domain::stats::{RankedEntry, StatsBundle};

const BAR_WIDTH: usize = 20;

/// Render a statistics bundle as a plain-text report.
pub fn render_text(stats: &StatsBundle, year: Option<i32>) -> String {
    let mut out = String::new();
    let scope = year.map_or_else(|| "all time".to_string(), |y| y.to_string());

    let _ = writeln!(out, "Reading statistics ({scope})");
    let _ = writeln!(out);
    let _ = writeln!(out, "Books read:        {}", format_number(stats.total_books));
    let _ = writeln!(out, "Pages read:        {}", format_pages(stats.total_pages));
    let _ = writeln!(out, "Average length:    {}", format_pages(stats.avg_pages_per_book));
    let _ = writeln!(out, "Reading days:      {}", format_days(stats.total_reading_days));
    let _ = writeln!(out, "Pages per day:     {}", stats.reading_speed);
    let _ = writeln!(
        out,
        "Reading time:      {} hours at {} pages/hour",
        stats.total_reading_time_hours, stats.reading_speed_pages_per_hour
    );
    if stats.has_reading_time_data {
        let _ = writeln!(out, "Days per book:     {}", stats.average_reading_time);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "This month: {} {}/{} ({}%)",
        progress_bar(stats.monthly_goal_progress, BAR_WIDTH),
        stats.books_this_month,
        stats.monthly_goal,
        stats.monthly_goal_progress
    );
    let _ = writeln!(
        out,
        "This year:  {} {}/{} ({}%)",
        progress_bar(stats.yearly_goal_progress, BAR_WIDTH),
        stats.books_this_year,
        stats.yearly_goal,
        stats.yearly_goal_progress
    );

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Shelves: {} reading, {} to read ({} purchased, {} to buy)",
        stats.reading_books, stats.to_read_books, stats.purchased_books, stats.to_buy_books
    );

    write_ranking(&mut out, "Top authors", &stats.top_authors);
    write_ranking(&mut out, "Top genres", &stats.top_genres);

    if !stats.monthly.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Monthly");
        for bucket in &stats.monthly {
            let _ = writeln!(
                out,
                "  {:<10} {:>3} books  {}",
                bucket.month,
                bucket.books,
                format_pages(bucket.pages)
            );
        }
    }

    if !stats.reading_time_distribution.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Time to finish");
        for bucket in &stats.reading_time_distribution {
            let _ = writeln!(out, "  {:<10} {}", bucket.range, bucket.value);
        }
    }

    out
}

fn write_ranking(out: &mut String, title: &str, entries: &[RankedEntry]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({})", rank + 1, entry.name, entry.count);
    }
}
