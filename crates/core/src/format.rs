//! Display helpers for the booking-facing schedule views: Indonesian short
//! dates, rupiah prices and clock-time ranges.

use chrono::{Datelike, NaiveDate, NaiveTime};

const INDONESIAN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Formats a date as day plus abbreviated Indonesian month, e.g. `15 Mei`.
pub fn indonesian_short_date(date: NaiveDate) -> String {
    let month = INDONESIAN_MONTHS
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{:02} {}", date.day(), month)
}

/// Formats an amount in the smallest rupiah unit, e.g. `Rp. 150.000`.
pub fn rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if amount < 0 {
        format!("Rp. -{grouped}")
    } else {
        format!("Rp. {grouped}")
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Normalises a stored clock time to `HH:MM`, leaving unparsable input as is.
pub fn short_clock(raw: &str) -> String {
    parse_clock_time(raw)
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `08:00 - 09:00`
pub fn time_range(start: &str, end: &str) -> String {
    format!("{} - {}", short_clock(start), short_clock(end))
}

/// Parses the `YYYY-MM-DD` dates accepted by the API.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
