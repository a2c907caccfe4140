use budgeting::{BudgetPeriod, BudgetStatus, BudgetSummary, CategoryBreakdown, Cents, TransactionType, advisory_message};
use categories::models::Category;
use chrono::{Datelike, NaiveDate};
use common::format::{CurrencyFormat, format_percentage};
use std::fmt::Write;
use transactions::models::{MonthlySummary, TransactionRecord};

const BAR_WIDTH: usize = 24;

pub fn render_summary(period: BudgetPeriod, summary: &BudgetSummary, currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let month_display = period.first_day().format("%B %Y");

    let _ = writeln!(out, "Budget for {}", month_display);
    let _ = writeln!(
        out,
        "  {} [{}] {}",
        status_marker(summary.status),
        bar(summary.percentage / 100.0),
        format_percentage(summary.percentage)
    );
    let _ = writeln!(out, "  Budget      {}", currency.format(summary.total_budget));
    let _ = writeln!(out, "  Spent       {}", currency.format(summary.total_spent));
    let _ = writeln!(out, "  Remaining   {}", currency.format(summary.remaining));
    let _ = writeln!(out, "  Days left   {}", summary.days_left);
    let _ = writeln!(out, "  Per day     {}", currency.format(summary.daily_allowance));
    let _ = writeln!(out, "  {}", advisory_message(summary, currency));
    out
}

pub fn render_breakdown(title: &str, breakdown: &CategoryBreakdown, currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);

    if breakdown.categories.is_empty() {
        let _ = writeln!(out, "  No transactions in this window.");
        return out;
    }

    let name_width = breakdown
        .categories
        .iter()
        .map(|c| c.name().chars().count())
        .max()
        .unwrap_or(0);

    for insight in &breakdown.categories {
        let share = insight.share_of(breakdown.total);
        let _ = writeln!(
            out,
            "  {} {:<width$} {:>12} [{}] {:>4}",
            insight.icon().unwrap_or("•"),
            insight.name(),
            currency.format(insight.total_amount),
            bar(share),
            format_percentage(share * 100.0),
            width = name_width
        );
    }
    let _ = writeln!(out, "  Total {}", currency.format(breakdown.total));
    out
}

pub fn render_categories(categories: &[Category]) -> String {
    let mut out = String::new();
    if categories.is_empty() {
        let _ = writeln!(out, "No categories yet.");
        return out;
    }
    for c in categories {
        let _ = writeln!(
            out,
            "{:>4}  {} {:<24} {:<8} {}",
            c.id,
            c.icon.as_deref().unwrap_or("•"),
            c.name,
            c.kind,
            c.color
        );
    }
    out
}

pub fn render_month_view(records: &[TransactionRecord], summary: &MonthlySummary, currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Transactions for {}", summary.period.first_day().format("%B %Y"));

    for t in records {
        let signed = match t.kind {
            TransactionType::Income => t.amount,
            TransactionType::Expense => -t.amount,
        };
        let _ = write!(
            out,
            "{:>6}  {}  {:<20} {:>12}",
            format!("#{}", t.id),
            t.transaction_date.format("%Y-%m-%d %H:%M"),
            t.category.name(),
            currency.format(signed)
        );
        match &t.notes {
            Some(notes) => {
                let _ = writeln!(out, "  {}", notes);
            }
            None => out.push('\n'),
        }
    }

    let _ = writeln!(out, "  Income    {}", currency.format(summary.total_income));
    let _ = writeln!(out, "  Expenses  {}", currency.format(summary.total_expenses));
    let _ = writeln!(out, "  Net       {}", currency.format(summary.net));
    out
}

/// Month grid, Monday first, each cell the day's total.
pub fn render_calendar(period: BudgetPeriod, days: &[(NaiveDate, Cents)], currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", period.first_day().format("%B %Y"));
    let _ = writeln!(out, "{}", ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].map(cell).join(""));

    let lead = period.first_day().weekday().num_days_from_monday() as usize;
    let mut line = cell("").repeat(lead);
    for (date, total) in days {
        let text = if *total == 0 {
            format!("{}", date.day())
        } else {
            format!("{} {}", date.day(), currency.format(*total))
        };
        line.push_str(&cell(&text));
        if date.weekday().num_days_from_monday() == 6 {
            let _ = writeln!(out, "{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn cell(text: &str) -> String {
    format!("{:<12}", text)
}

fn status_marker(status: BudgetStatus) -> String {
    match status {
        BudgetStatus::Safe => format!("● {}", status),
        BudgetStatus::Warning => format!("▲ {}", status),
        BudgetStatus::Danger => format!("■ {}", status),
    }
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
