use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
    #[error("Year {0} is outside the supported calendar")]
    YearOutOfRange(i32),
    #[error("Invalid month format: {0}. Expected YYYY-MM")]
    InvalidFormat(String),
}

/// A (year, month) pair scoping budgets and their summary.
///
/// Serialized as `"YYYY-MM"`; deserializing goes through [`BudgetPeriod::new`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct BudgetPeriod {
    year: i32,
    month: u32,
}

impl BudgetPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        // Both ends must be representable for the month arithmetic below.
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::YearOutOfRange(year))?;
        first
            .checked_add_months(Months::new(1))
            .ok_or(PeriodError::YearOutOfRange(year))?;
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Calendar-date membership; any time on the last day counts.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let date = at.date();
        date >= self.first_day() && date <= self.last_day()
    }

    /// Days from `today` (inclusive) through the last day of the period.
    pub fn days_left(&self, today: NaiveDate) -> u32 {
        let first = self.first_day();
        let last = self.last_day();
        if today < first {
            self.days_in_month()
        } else if today > last {
            0
        } else {
            last.day() - today.day() + 1
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BudgetPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodError::InvalidFormat(s.to_string()))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(PeriodError::InvalidFormat(s.to_string()));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for BudgetPeriod {
    type Error = PeriodError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BudgetPeriod> for String {
    fn from(period: BudgetPeriod) -> Self {
        period.to_string()
    }
}
