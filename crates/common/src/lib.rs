use clap::Args;

pub mod format;

use format::{CurrencyFormat, Locale};

#[derive(Clone, Debug, Args)]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:budget.db", global = true)]
    pub database_url: String,

    #[arg(long, env = "BUDGET_USER", default_value = "default", global = true)]
    pub user: String,

    #[arg(long, env = "BUDGET_LOCALE", value_enum, default_value_t = Locale::EnUs, global = true)]
    pub locale: Locale,
}

impl Config {
    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::from_locale(self.locale)
    }
}
