use chrono::NaiveDate;

/// Day string written into new records.
pub fn day_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reads a stored day string. Besides `YYYY-MM-DD` this accepts the
/// `Mon Jan 01 2024` form found in older backups.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%a %b %d %Y"))
        .ok()
}

/// Short label for list rows, e.g. `Mon, Jan 1`.
pub fn day_label(value: &str) -> String {
    match parse_day(value) {
        Some(date) => date.format("%a, %b %-d").to_string(),
        None => value.to_owned(),
    }
}

/// Long form, e.g. `Monday, January 1, 2024`.
pub fn full_day_label(value: &str) -> String {
    match parse_day(value) {
        Some(date) => date.format("%A, %B %-d, %Y").to_string(),
        None => value.to_owned(),
    }
}
