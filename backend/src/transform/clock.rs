//! Date source for campaign start dates.

use chrono::{Local, NaiveDate};

/// Bulk sheet date format.
pub const START_DATE_FORMAT: &str = "%Y%m%d";

pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Today as `YYYYMMDD`.
    fn start_date(&self) -> String {
        self.today().format(START_DATE_FORMAT).to_string()
    }
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
