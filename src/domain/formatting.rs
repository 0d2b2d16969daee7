/// Format a figure with exactly one decimal place ("10.0", "2.5").
pub fn format_one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

/// Format a page count for display.
pub fn format_pages(pages: u64) -> String {
    if pages == 1 {
        "1 page".to_string()
    } else {
        format!("{} pages", format_number(pages))
    }
}

/// Format a day count for display.
pub fn format_days(days: u64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", format_number(days))
    }
}

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    if n < 1_000 {
        return n.to_string();
    }
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Render a 0-100 percentage as a fixed-width text bar.
pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
