//! Calendar bucketing for trip dates.

use chrono::{Datelike, Duration, NaiveDate};

/// `YYYY-MM` label for the month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Week of the year, Sunday as first day, zero padded (`%U`).
pub fn week_label(date: NaiveDate) -> String {
    date.format("%U").to_string()
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

pub fn from_epoch_days(days: i32) -> NaiveDate {
    epoch() + Duration::days(i64::from(days))
}
