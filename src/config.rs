use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::date;

/// Settings shared by every command. Each flag can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Database file path
    #[arg(short, long, global = true, env = "TALLY_DATABASE", default_value = "tally.db")]
    pub database: String,

    /// Currency symbol used when displaying amounts
    #[arg(long, global = true, env = "TALLY_CURRENCY", default_value = "$")]
    pub currency: String,

    /// Evaluate as of this day (YYYY-MM-DD) instead of the local date
    #[arg(long, global = true, env = "TALLY_TODAY")]
    pub today: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Config {
    /// The evaluation day: the `--today` override, or the local calendar day.
    pub fn today(&self) -> Result<NaiveDate> {
        match &self.today {
            Some(raw) => date::parse_day(raw)
                .with_context(|| format!("Invalid --today '{}'. Use YYYY-MM-DD", raw)),
            None => Ok(date::local_today()),
        }
    }

    /// Default log filter. `RUST_LOG` wins when set.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "tally=debug" } else { "warn" }
    }
}

/// Install the global tracing subscriber, logging to stderr.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(today: Option<&str>, verbose: bool) -> Config {
        Config {
            database: "tally.db".into(),
            currency: "$".into(),
            today: today.map(String::from),
            verbose,
        }
    }

    #[test]
    fn test_today_override() {
        let cfg = config(Some("2025-01-03"), false);
        assert_eq!(
            cfg.today().unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_today_override_rejects_bad_dates() {
        assert!(config(Some("03/01/2025"), false).today().is_err());
    }

    #[test]
    fn test_log_filter_follows_verbose() {
        assert_eq!(config(None, false).log_filter(), "warn");
        assert_eq!(config(None, true).log_filter(), "tally=debug");
    }
}
