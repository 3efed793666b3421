use chrono::{Duration, NaiveDate};

use crate::{models::DayRecord, utils::format};

pub const WINDOW_DAYS: u32 = 30;

/// The 30 calendar days ending on (and including) `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    end: NaiveDate,
}

impl DateWindow {
    pub fn ending(end: NaiveDate) -> Self {
        Self { end }
    }

    /// Exclusive lower bound, `end - 30 days`. Analytics queries filter on `date > after`.
    pub fn after(&self) -> NaiveDate {
        self.end - Duration::days(WINDOW_DAYS as i64)
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let after = self.after();

        (1..=WINDOW_DAYS as i64).map(move |offset| after + Duration::days(offset))
    }

    pub fn records(&self) -> Vec<DayRecord> {
        self.dates()
            .map(|date| DayRecord {
                date: format(date),
                domains: Default::default(),
            })
            .collect()
    }
}
