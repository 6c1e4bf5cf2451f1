//! Calendar-month buckets for dashboard and analytics series. All times are UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
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

    /// First instant of the month.
    pub fn start(self) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// First instant of the following month.
    pub fn end(self) -> DateTime<Utc> {
        self.next().start()
    }

    pub fn contains(self, at: DateTime<Utc>) -> bool {
        at >= self.start() && at < self.end()
    }

    pub fn label(self) -> &'static str {
        MONTH_LABELS
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("")
    }
}

/// The `count` months ending with the month of `now`, oldest first.
pub fn last_months(now: DateTime<Utc>, count: usize) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(count);
    let mut month = YearMonth::of(now);
    for _ in 0..count {
        months.push(month);
        month = month.previous();
    }
    months.reverse();
    months
}

/// The twelve months of the year containing `now`.
pub fn months_of_year(now: DateTime<Utc>) -> Vec<YearMonth> {
    (1..=12)
        .map(|month| YearMonth { year: now.year(), month })
        .collect()
}

pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
