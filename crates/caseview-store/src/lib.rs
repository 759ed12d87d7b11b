//! Query log storage: an in-process list and a DuckDB-backed table pair.
//!
//! Both implement [`QueryLog`]. A query is recorded as `pending` before the
//! lookup runs and completed exactly once afterwards; on success the completion
//! also stores the single [`CaseResult`] linked to it.

mod error;
mod memory;
pub use error::StoreError;
pub use memory::MemoryLog;

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;

use caseview_core::{CaseResult, NewQuery, Outcome, Query};

/// Persistent record of lookup attempts.
///
/// Every method takes `&self`; implementations serialise writes internally so
/// a reader never observes a query half-completed.
pub trait QueryLog: Send + Sync {
    /// Store a new query with status `pending` and return it with its id.
    fn record(&self, query: NewQuery) -> Result<Query, StoreError>;

    /// Set the final status of a pending query, creating its result on success.
    ///
    /// Fails with [`StoreError::AlreadyCompleted`] if the query has left `pending`.
    fn complete(&self, query_id: i64, outcome: &Outcome) -> Result<Query, StoreError>;

    /// The most recent `limit` queries, newest first.
    fn history(&self, limit: usize) -> Result<Vec<Query>, StoreError>;

    /// The result linked to a query, if the query succeeded.
    fn result_for(&self, query_id: i64) -> Result<Option<CaseResult>, StoreError>;
}
