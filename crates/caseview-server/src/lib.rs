//! Web front-end: search form, results, query history, and the static case list.

pub mod config;
pub mod flash;
pub mod render;
pub mod routes;
pub mod search;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use caseview_core::CaseTable;
use caseview_source::{CourtScraper, LookupService};
use caseview_store::{DuckStore, MemoryLog, QueryLog, StoreError};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{Cli, Config, StrategyKind};
use flash::FlashSigner;
use render::Nav;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub lookup: LookupService,
    pub log: Arc<dyn QueryLog>,
    pub flash: FlashSigner,
    pub max_filing_year: i32,
    pub history_limit: usize,
}

impl AppState {
    pub fn new(lookup: LookupService, log: Arc<dyn QueryLog>, config: &Config) -> Self {
        Self {
            lookup,
            log,
            flash: FlashSigner::new(&config.session_secret),
            max_filing_year: config.max_filing_year,
            history_limit: config.history_limit,
        }
    }

    /// Build the lookup strategy and query log the configuration asks for.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let lookup = match config.strategy {
            StrategyKind::Static => LookupService::static_table(CaseTable::seeded()),
            StrategyKind::External => LookupService::external(CourtScraper::default()),
        };
        let log: Arc<dyn QueryLog> = match &config.database {
            Some(path) => Arc::new(DuckStore::open_persistent(path)?),
            None => {
                info!("no database configured, keeping query history in memory");
                Arc::new(MemoryLog::new())
            }
        };
        info!(source = lookup.source_name(), "lookup strategy ready");
        Ok(Self::new(lookup, log, config))
    }

    pub(crate) fn nav(&self) -> Nav {
        Nav {
            cases: self.lookup.case_table().is_some(),
        }
    }
}

/// Create the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/search", post(routes::search))
        .route("/history", get(routes::history))
        .route("/cases", get(routes::cases))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(routes::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
