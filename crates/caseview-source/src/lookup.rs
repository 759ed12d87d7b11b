//! Lookup service: one strategy per deployment, static table or external source.

use std::sync::Arc;

use caseview_core::{CaseFound, CaseKey, CaseTable, Outcome};
use tracing::info;

use crate::CaseSource;

const STATIC_TABLE_NAME: &str = "Static case table";

/// Where lookups are answered from.
#[derive(Clone)]
pub enum Strategy {
    /// Exact-key match against a preloaded table. Total and side-effect free.
    StaticTable(Arc<CaseTable>),
    /// Delegate to an external court source.
    External(Arc<dyn CaseSource>),
}

/// Turns a validated [`CaseKey`] into an [`Outcome`]. Logging is the caller's job.
#[derive(Clone)]
pub struct LookupService {
    strategy: Strategy,
}

impl LookupService {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn static_table(table: CaseTable) -> Self {
        Self::new(Strategy::StaticTable(Arc::new(table)))
    }

    pub fn external(source: impl CaseSource + 'static) -> Self {
        Self::new(Strategy::External(Arc::new(source)))
    }

    /// Name recorded as the source of each query.
    pub fn source_name(&self) -> &str {
        match &self.strategy {
            Strategy::StaticTable(_) => STATIC_TABLE_NAME,
            Strategy::External(source) => source.name(),
        }
    }

    /// The static table, when that strategy is in use.
    pub fn case_table(&self) -> Option<&CaseTable> {
        match &self.strategy {
            Strategy::StaticTable(table) => Some(table),
            Strategy::External(_) => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self.strategy, Strategy::External(_))
    }

    pub async fn lookup(&self, key: &CaseKey) -> Outcome {
        let outcome = match &self.strategy {
            Strategy::StaticTable(table) => match table.get(key) {
                Some(record) => Outcome::Success(Box::new(CaseFound::from_record(record))),
                None => Outcome::NotFound,
            },
            Strategy::External(source) => source.lookup(key).await,
        };
        info!(%key, source = self.source_name(), status = %outcome.status(), "lookup finished");
        outcome
    }
}
