//! The search pipeline: validate, record, look up, complete.

use caseview_core::{
    CaseResult, LookupFailure, NewQuery, Outcome, Query, SearchInput, ValidationError, validate,
};
use caseview_source::LookupService;
use caseview_store::{QueryLog, StoreError};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("query log error: {0}")]
    Store(#[from] StoreError),
}

/// Everything the results page needs about one search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub query: Query,
    /// Present only when the lookup succeeded.
    pub result: Option<CaseResult>,
    pub outcome: Outcome,
}

pub async fn run_search(
    lookup: &LookupService,
    log: &dyn QueryLog,
    input: &SearchInput,
    max_filing_year: i32,
) -> Result<SearchReport, SearchError> {
    let key = validate(input, max_filing_year)?;

    let query = log.record(NewQuery {
        key: key.clone(),
        source: Some(lookup.source_name().to_string()),
    })?;
    info!(id = query.id, %key, "new case query");

    let outcome = lookup.lookup(&key).await;
    if let Outcome::Failure(failure) = &outcome {
        warn!(id = query.id, reason = %failure.reason, "case lookup failed");
    }

    let query = match log.complete(query.id, &outcome) {
        Ok(query) => query,
        Err(e) => {
            abandon(log, query.id, &e);
            return Err(e.into());
        }
    };
    let result = if outcome.is_success() {
        log.result_for(query.id)?
    } else {
        None
    };

    Ok(SearchReport {
        query,
        result,
        outcome,
    })
}

/// Close out a query whose completion failed so it does not stay pending.
fn abandon(log: &dyn QueryLog, query_id: i64, cause: &StoreError) {
    let failure = Outcome::Failure(LookupFailure::new(format!("query log error: {cause}")));
    if let Err(e) = log.complete(query_id, &failure) {
        error!(id = query_id, error = %e, cause = %cause, "failed to close out query");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use caseview_core::{CaseTable, QueryStatus};
    use caseview_source::CourtScraper;
    use caseview_store::{DuckStore, MemoryLog};

    /// Memory log whose first `complete` call fails.
    #[derive(Default)]
    struct FlakyLog {
        inner: MemoryLog,
        tripped: AtomicBool,
    }

    impl QueryLog for FlakyLog {
        fn record(&self, query: NewQuery) -> Result<Query, StoreError> {
            self.inner.record(query)
        }

        fn complete(&self, query_id: i64, outcome: &Outcome) -> Result<Query, StoreError> {
            if !self.tripped.swap(true, Ordering::SeqCst) {
                return Err(StoreError::Poisoned);
            }
            self.inner.complete(query_id, outcome)
        }

        fn history(&self, limit: usize) -> Result<Vec<Query>, StoreError> {
            self.inner.history(limit)
        }

        fn result_for(&self, query_id: i64) -> Result<Option<CaseResult>, StoreError> {
            self.inner.result_for(query_id)
        }
    }

    fn input(case_type: &str, case_number: &str, filing_year: &str) -> SearchInput {
        SearchInput {
            case_type: Some(case_type.into()),
            case_number: Some(case_number.into()),
            filing_year: Some(filing_year.into()),
        }
    }

    #[tokio::test]
    async fn static_hit_logs_success_and_result() {
        let lookup = LookupService::static_table(CaseTable::seeded());
        let log = MemoryLog::new();
        let report = run_search(&lookup, &log, &input("WP", "135", "1970"), 2026)
            .await
            .unwrap();
        assert_eq!(report.query.status, QueryStatus::Success);
        assert_eq!(report.query.source.as_deref(), Some("Static case table"));
        let result = report.result.unwrap();
        assert_eq!(result.query_id, report.query.id);
        assert_eq!(
            result.details.petitioner_name.as_deref(),
            Some("Kesavananda Bharati Sripadagalvaru")
        );
    }

    #[tokio::test]
    async fn static_miss_is_not_found() {
        let lookup = LookupService::static_table(CaseTable::seeded());
        let log = MemoryLog::new();
        let report = run_search(&lookup, &log, &input("WP", "999", "1999"), 2026)
            .await
            .unwrap();
        assert_eq!(report.outcome, Outcome::NotFound);
        assert_eq!(report.query.status, QueryStatus::Failed);
        assert!(report.result.is_none());
    }

    #[tokio::test]
    async fn stub_failure_is_logged_in_duckdb() {
        let lookup = LookupService::external(CourtScraper::default());
        let log = DuckStore::open().unwrap();
        let report = run_search(&lookup, &log, &input("WP", "135", "1970"), 2026)
            .await
            .unwrap();
        assert!(matches!(report.outcome, Outcome::Failure(_)));
        assert!(report.result.is_none());
        assert_eq!(log.result_count().unwrap(), 0);

        let history = log.history(50).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, QueryStatus::Failed);
        assert_eq!(history[0].source.as_deref(), Some("Delhi High Court"));
        assert!(history[0].error_message.as_deref().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn invalid_input_logs_nothing() {
        let lookup = LookupService::static_table(CaseTable::seeded());
        let log = MemoryLog::new();
        let err = run_search(&lookup, &log, &input("WP", "135", "1949"), 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
        assert!(log.history(50).unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_completion_closes_out_query() {
        let lookup = LookupService::static_table(CaseTable::seeded());
        let log = FlakyLog::default();
        let err = run_search(&lookup, &log, &input("WP", "135", "1970"), 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Store(StoreError::Poisoned)));

        let history = log.history(50).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, QueryStatus::Failed);
        assert!(
            history[0]
                .error_message
                .as_deref()
                .unwrap()
                .starts_with("query log error:")
        );
        assert!(log.result_for(history[0].id).unwrap().is_none());
    }
}
