//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use clap::{Parser, ValueEnum};
use tracing::warn;

/// Secret used when `SESSION_SECRET` is unset. Fine for local use only.
pub const DEFAULT_SESSION_SECRET: &str = "simple-court-app";

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Which lookup strategy this process serves. The two are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// Built-in table of landmark cases.
    Static,
    /// External court website (placeholder scraper).
    External,
}

#[derive(Debug, Parser)]
#[command(name = "caseview", version, about = "Court case lookup form with query history")]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "CASEVIEW_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Lookup strategy
    #[arg(long, env = "CASEVIEW_STRATEGY", value_enum, default_value_t = StrategyKind::Static)]
    pub strategy: StrategyKind,

    /// DuckDB file for the query log; the log is kept in memory when unset
    #[arg(long, env = "CASEVIEW_DATABASE")]
    pub database: Option<PathBuf>,

    /// Secret for signing flash-message cookies
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Latest accepted filing year (defaults to the current year)
    #[arg(long, env = "CASEVIEW_MAX_FILING_YEAR")]
    pub max_filing_year: Option<i32>,

    /// Number of queries shown on the history page
    #[arg(long, env = "CASEVIEW_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub strategy: StrategyKind,
    pub database: Option<PathBuf>,
    pub session_secret: String,
    pub max_filing_year: i32,
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            strategy: StrategyKind::Static,
            database: None,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            max_filing_year: current_year(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let session_secret = cli.session_secret.unwrap_or_else(|| {
            warn!("SESSION_SECRET not set, using the built-in development secret");
            DEFAULT_SESSION_SECRET.to_string()
        });
        Self {
            bind: cli.bind,
            strategy: cli.strategy,
            database: cli.database,
            session_secret,
            max_filing_year: cli.max_filing_year.unwrap_or_else(current_year),
            history_limit: cli.history_limit,
        }
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "caseview",
            "--bind",
            "127.0.0.1:8080",
            "--strategy",
            "external",
            "--database",
            "/tmp/q.duckdb",
            "--session-secret",
            "s3cret",
            "--max-filing-year",
            "2024",
            "--history-limit",
            "10",
        ])
        .unwrap();
        let config = Config::from(cli);
        assert_eq!(config.bind, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.strategy, StrategyKind::External);
        assert_eq!(config.database, Some(PathBuf::from("/tmp/q.duckdb")));
        assert_eq!(config.session_secret, "s3cret");
        assert_eq!(config.max_filing_year, 2024);
        assert_eq!(config.history_limit, 10);
    }

    #[test]
    fn unknown_strategy_rejected() {
        assert!(Cli::try_parse_from(["caseview", "--strategy", "scrape"]).is_err());
    }

    #[test]
    fn default_max_year_is_current_year() {
        assert_eq!(Config::default().max_filing_year, Utc::now().year());
        assert_eq!(Config::default().history_limit, 50);
    }
}
