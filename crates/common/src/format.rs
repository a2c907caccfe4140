//! Display helpers for money and percentages.
//!
//! Amounts are stored as cents and only rounded here, at display time.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    #[value(name = "en-US")]
    EnUs,
    #[value(name = "en-IN")]
    EnIn,
}

/// Digit grouping style for the integer part of an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567
    Indian,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: Grouping,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, grouping: Grouping) -> Self {
        Self {
            symbol: symbol.into(),
            grouping,
        }
    }

    pub fn from_locale(locale: Locale) -> Self {
        match locale {
            Locale::EnUs => Self::new("$", Grouping::Thousands),
            Locale::EnIn => Self::new("₹", Grouping::Indian),
        }
    }

    /// Renders `cents` as a whole currency amount, e.g. `-$2,000`.
    pub fn format(&self, cents: i64) -> String {
        let units = round_to_units(cents);
        let digits = group_digits(&units.unsigned_abs().to_string(), self.grouping);
        if units < 0 {
            format!("-{}{}", self.symbol, digits)
        } else {
            format!("{}{}", self.symbol, digits)
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::from_locale(Locale::EnUs)
    }
}

/// Half away from zero, matching how the amount reads on a receipt.
fn round_to_units(cents: i64) -> i64 {
    let units = cents / 100;
    let rest = cents % 100;
    if rest >= 50 {
        units + 1
    } else if rest <= -50 {
        units - 1
    } else {
        units
    }
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let step = match grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.0}%", value.round())
}
