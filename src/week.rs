use chrono::{Datelike, Duration, NaiveDate};

use crate::validate::DATE_FORMAT;

/// A Monday-to-Sunday week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        Self {
            start: date - Duration::days(offset),
        }
    }

    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    pub fn prev(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// Inclusive `YYYY-MM-DD` bounds for a range query.
    pub fn range_strings(&self) -> (String, String) {
        (date_key(self.start), date_key(self.end()))
    }

    /// "June 2024", or "May 2024 - June 2024" when the week spans two months.
    pub fn title(&self) -> String {
        let end = self.end();
        if self.start.month() == end.month() {
            self.start.format("%B %Y").to_string()
        } else {
            format!("{} - {}", self.start.format("%b %Y"), end.format("%B %Y"))
        }
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Column heading for a day, e.g. "Mon, Jun 10".
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a, %b %d").to_string()
}
