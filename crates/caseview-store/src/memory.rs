//! In-process query log for deployments without a database file.

use std::sync::{Mutex, MutexGuard};

use caseview_core::{CaseResult, NewQuery, Outcome, Query, QueryStatus};
use chrono::Utc;
use tracing::debug;

use crate::{QueryLog, StoreError};

#[derive(Default)]
struct Entries {
    queries: Vec<Query>,
    results: Vec<CaseResult>,
    next_query_id: i64,
    next_result_id: i64,
}

/// Query log held in memory behind a single mutex. Lost on restart.
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Entries>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl QueryLog for MemoryLog {
    fn record(&self, query: NewQuery) -> Result<Query, StoreError> {
        let mut entries = self.lock()?;
        entries.next_query_id += 1;
        let query = Query {
            id: entries.next_query_id,
            key: query.key,
            source: query.source,
            queried_at: Utc::now(),
            status: QueryStatus::Pending,
            error_message: None,
            raw_response: None,
        };
        entries.queries.push(query.clone());
        debug!(id = query.id, key = %query.key, "recorded query in memory");
        Ok(query)
    }

    fn complete(&self, query_id: i64, outcome: &Outcome) -> Result<Query, StoreError> {
        let mut entries = self.lock()?;

        // Build the result before touching the query so a serialisation
        // failure leaves the entry pending.
        let raw_response = match outcome {
            Outcome::Success(found) => Some(found.raw_text()?),
            Outcome::NotFound | Outcome::Failure(_) => None,
        };

        let Entries {
            queries,
            results,
            next_result_id,
            ..
        } = &mut *entries;

        let query = queries
            .iter_mut()
            .find(|q| q.id == query_id)
            .ok_or(StoreError::QueryNotFound(query_id))?;
        if query.status != QueryStatus::Pending {
            return Err(StoreError::AlreadyCompleted(query_id));
        }

        query.status = outcome.status();
        query.error_message = outcome.error_message(&query.key);
        query.raw_response = raw_response;

        if let Outcome::Success(found) = outcome {
            *next_result_id += 1;
            results.push(CaseResult {
                id: *next_result_id,
                query_id,
                details: found.details.clone(),
                created_at: Utc::now(),
            });
        }

        Ok(query.clone())
    }

    fn history(&self, limit: usize) -> Result<Vec<Query>, StoreError> {
        let entries = self.lock()?;
        let mut recent: Vec<Query> = entries.queries.clone();
        recent.sort_by(|a, b| (b.queried_at, b.id).cmp(&(a.queried_at, a.id)));
        recent.truncate(limit);
        Ok(recent)
    }

    fn result_for(&self, query_id: i64) -> Result<Option<CaseResult>, StoreError> {
        let entries = self.lock()?;
        Ok(entries
            .results
            .iter()
            .find(|r| r.query_id == query_id)
            .cloned())
    }
}
