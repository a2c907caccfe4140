use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reporting window presets, each running from its start up to `now`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Daily,
    Monthly,
    Yearly,
}

impl TimeWindow {
    pub fn bounds(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let today = now.date();
        let start = match self {
            TimeWindow::Daily => today,
            TimeWindow::Monthly => today.with_day(1).unwrap_or(today),
            TimeWindow::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        };
        (start.and_time(NaiveTime::MIN), now)
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(TimeWindow::Daily),
            "monthly" | "month" => Ok(TimeWindow::Monthly),
            "yearly" | "year" => Ok(TimeWindow::Yearly),
            other => Err(format!("Unknown time window: {}", other)),
        }
    }
}
