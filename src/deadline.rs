//! Review deadline calculation

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::error::{Error, Result};

/// Business days stakeholders get to respond to a review request
pub const REVIEW_BUSINESS_DAYS: u32 = 3;

/// Default display format, e.g. "Wednesday January 8"
pub const DEFAULT_DEADLINE_FORMAT: &str = "%A %B %-d";

/// Source of "today"
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A review deadline, always Monday through Friday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(NaiveDate);

impl Deadline {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Render with a strftime pattern
    pub fn format(&self, pattern: &str) -> Result<String> {
        check_format(pattern)?;
        let mut out = String::new();
        write!(out, "{}", self.0.format(pattern))
            .map_err(|_| invalid_format(pattern))?;
        Ok(out)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DEFAULT_DEADLINE_FORMAT))
    }
}

/// Reject strftime patterns chrono cannot render
pub fn check_format(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(invalid_format(pattern));
    }
    Ok(())
}

fn invalid_format(pattern: &str) -> Error {
    Error::Config(format!("invalid deadline format {:?}", pattern))
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Date three business days after `reference`
///
/// The reference day itself never counts. Weekends are stepped over.
pub fn compute_deadline(reference: NaiveDate) -> Deadline {
    Deadline(add_business_days(reference, REVIEW_BUSINESS_DAYS))
}

fn add_business_days(start: NaiveDate, days: u32) -> NaiveDate {
    let mut current = start;
    let mut counted = 0;

    while counted < days {
        let Some(next) = current.succ_opt() else {
            break;
        };
        current = next;
        if is_business_day(current) {
            counted += 1;
        }
    }

    current
}
