use budgeting::{BudgetPeriod, TimeWindow, TransactionType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use categories::service::CategoryService;
use clap::{Parser, Subcommand};
use common::Config;
use database::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transactions::service::TransactionService;

mod dashboard;
mod report;

use dashboard::Dashboard;

#[derive(Debug, Parser)]
#[command(author, version, about = "Track spending against monthly budgets", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show spending against this month's budget
    Summary {
        /// Month to report, YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<BudgetPeriod>,
        /// Reference date for days left, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Rank categories by total for a time window
    Insights {
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,
        #[arg(long, default_value = "monthly")]
        window: TimeWindow,
    },
    /// Daily totals laid out as a month calendar
    Calendar {
        #[arg(long)]
        month: Option<BudgetPeriod>,
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,
    },
    /// List categories with their ids
    Categories,
    /// List a month's transactions with income and expense totals
    Transactions {
        #[arg(long)]
        month: Option<BudgetPeriod>,
    },
    AddCategory {
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    AddTransaction {
        #[arg(long)]
        amount: f64,
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,
        #[arg(long)]
        category: Option<i64>,
        /// YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS (defaults to now)
        #[arg(long, value_parser = parse_timestamp)]
        date: Option<NaiveDateTime>,
        #[arg(long)]
        notes: Option<String>,
    },
    DeleteTransaction {
        #[arg(long)]
        id: i64,
    },
    SetBudget {
        #[arg(long)]
        month: Option<BudgetPeriod>,
        #[arg(long)]
        amount: f64,
        /// Limit one category instead of the whole month
        #[arg(long)]
        category: Option<i64>,
    },
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(at) = s.parse::<NaiveDateTime>() {
        return Ok(at);
    }
    s.parse::<NaiveDate>()
        .map(|d| d.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)))
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS", s))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 1. Initialize Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 2. Load Config from CLI args
    let cli = Cli::parse();
    let config = cli.config;
    let currency = config.currency();

    // 3. Initialize Database
    let db = Database::new(&config.database_url).await?;
    db.run_migrations().await?;
    tracing::debug!("Using {} for user {}", config.database_url, config.user);

    // The wall clock is read here and nowhere else.
    let now = chrono::Local::now().naive_local();
    let this_month = BudgetPeriod::containing(now.date());

    let mut dashboard = Dashboard::new(&db, config.user.clone());

    match cli.command {
        Command::Summary { month, today } => {
            let period = month.unwrap_or(this_month);
            let today = today.unwrap_or(now.date());
            dashboard.prepare_period(period).await?;
            let summary = dashboard.summary(period, today).await?;
            print!("{}", report::render_summary(period, &summary, &currency));
        }
        Command::Insights { kind, window } => {
            let (start, end) = window.bounds(now);
            let breakdown = TransactionService::category_insights(&db, &config.user, kind, start, end).await?;
            let title = format!("{} by category since {}", capitalize(&kind.to_string()), start.date());
            print!("{}", report::render_breakdown(&title, &breakdown, &currency));
        }
        Command::Calendar { month, kind } => {
            let period = month.unwrap_or(this_month);
            let days = TransactionService::daily_totals(&db, &config.user, kind, period).await?;
            print!("{}", report::render_calendar(period, &days, &currency));
        }
        Command::Categories => {
            let categories = CategoryService::list_categories(&db, &config.user).await?;
            print!("{}", report::render_categories(&categories));
        }
        Command::Transactions { month } => {
            let period = month.unwrap_or(this_month);
            let (records, summary) = TransactionService::get_month_view(&db, &config.user, period).await?;
            print!("{}", report::render_month_view(&records, &summary, &currency));
        }
        Command::AddCategory { name, kind, color, icon } => {
            let id = dashboard.add_category(name, kind, color, icon).await?;
            println!("Created category #{}", id);
        }
        Command::AddTransaction { amount, kind, category, date, notes } => {
            let at = date.unwrap_or(now);
            let id = dashboard.record_transaction(category, kind, at, amount, notes).await?;
            println!("Recorded {} #{}", kind, id);

            let period = BudgetPeriod::containing(at.date());
            if kind == TransactionType::Expense {
                let summary = dashboard.summary(period, now.date()).await?;
                print!("{}", report::render_summary(period, &summary, &currency));
            }
        }
        Command::DeleteTransaction { id } => {
            dashboard.delete_transaction(id).await?;
            println!("Deleted transaction #{}", id);
        }
        Command::SetBudget { month, amount, category } => {
            let period = month.unwrap_or(this_month);
            dashboard.set_budget(period, category, amount).await?;
            let summary = dashboard.summary(period, now.date()).await?;
            print!("{}", report::render_summary(period, &summary, &currency));
        }
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
