//! Calendar-month bucketing for the analytics time series.
//!
//! Month boundaries depend on the time zone. All bucketing goes through a
//! single configured [`Tz`] so that a payment made at 23:30 UTC on 31 March
//! lands in April for a Paris-based marketplace.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Length of the trailing window, current month included
pub const WINDOW_MONTHS: u32 = 6;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jun", "Jul", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// A calendar month, serialized as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing `at` in the given time zone
    pub fn of(at: DateTime<Utc>, tz: &Tz) -> Self {
        let local = at.with_timezone(tz);
        Self {
            year: local.year(),
            month: local.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Display label, e.g. `Fév 2025`
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_LABELS[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One entry of a monthly time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub period: MonthKey,
    pub value: i64,
}

/// Months covered by the trailing series, oldest first
///
/// The window ends at the month containing `now` and spans
/// [`WINDOW_MONTHS`] months, unless the marketplace is younger than that:
/// when `inception` (the earliest known record) falls inside the window, the
/// window starts at the inception month instead. Without any record the full
/// window is returned.
pub fn trailing_window(now: DateTime<Utc>, tz: &Tz, inception: Option<DateTime<Utc>>) -> Vec<MonthKey> {
    let current = MonthKey::of(now, tz);

    let mut first = current;
    for _ in 1..WINDOW_MONTHS {
        first = first.previous();
    }
    if let Some(inception) = inception {
        let born = MonthKey::of(inception, tz).min(current);
        first = first.max(born);
    }

    let mut months = Vec::with_capacity(WINDOW_MONTHS as usize);
    let mut month = first;
    while month <= current {
        months.push(month);
        month = month.next();
    }
    months
}

/// Sum `(timestamp, value)` entries per month of `window`
///
/// Months without entries are zero-filled; entries outside the window are
/// ignored.
pub fn bucket_by_month<I>(window: &[MonthKey], tz: &Tz, entries: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = (DateTime<Utc>, i64)>,
{
    let mut sums: BTreeMap<MonthKey, i64> = window.iter().map(|m| (*m, 0)).collect();

    for (at, value) in entries {
        if let Some(sum) = sums.get_mut(&MonthKey::of(at, tz)) {
            *sum += value;
        }
    }

    window
        .iter()
        .map(|period| SeriesPoint {
            period: *period,
            value: sums.get(period).copied().unwrap_or(0),
        })
        .collect()
}
