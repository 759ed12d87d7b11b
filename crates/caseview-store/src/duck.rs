//! DuckDB storage for the query log.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use caseview_core::{CaseDetails, CaseKey, CaseResult, NewQuery, Outcome, Query, QueryStatus};
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{Connection, params};
use tracing::info;

use crate::{QueryLog, StoreError};

const SCHEMA: &str = "
CREATE SEQUENCE IF NOT EXISTS case_query_id_seq START 1;
CREATE SEQUENCE IF NOT EXISTS case_result_id_seq START 1;

CREATE TABLE IF NOT EXISTS case_query (
    id BIGINT PRIMARY KEY,
    case_type VARCHAR NOT NULL,
    case_number VARCHAR NOT NULL,
    filing_year INTEGER NOT NULL,
    source VARCHAR,
    queried_at_us BIGINT NOT NULL,
    status VARCHAR NOT NULL,
    error_message VARCHAR,
    raw_response VARCHAR
);

CREATE TABLE IF NOT EXISTS case_result (
    id BIGINT PRIMARY KEY,
    query_id BIGINT NOT NULL UNIQUE,
    petitioner_name VARCHAR,
    respondent_name VARCHAR,
    filing_date VARCHAR,
    next_hearing_date VARCHAR,
    case_status VARCHAR,
    judge_name VARCHAR,
    document_links VARCHAR NOT NULL,
    created_at_us BIGINT NOT NULL
);
";

const QUERY_COLUMNS: &str = "id, case_type, case_number, filing_year, source, queried_at_us, \
                             status, error_message, raw_response";

const RESULT_COLUMNS: &str = "id, query_id, petitioner_name, respondent_name, filing_date, \
                              next_hearing_date, case_status, judge_name, document_links, \
                              created_at_us";

/// DuckDB-backed query log.
///
/// Two tables: `case_query` (one row per submission) and `case_result` (at most
/// one row per query, written in the same transaction that marks the query
/// successful). Ids come from sequences, timestamps are stored as UTC
/// microseconds.
///
/// Use [`open`](Self::open) for an in-memory database and
/// [`open_persistent`](Self::open_persistent) for a file that survives restarts.
pub struct DuckStore {
    conn: Mutex<Connection>,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open or create a persistent DuckDB database at the given path.
    ///
    /// Tables are created on first open; existing rows are kept.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let store = Self::init(Connection::open(path)?)?;
        let queries = store.query_count()?;
        info!(path = %path.display(), queries, "opened query log");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    // ── Counts ──

    /// Number of rows in `case_query`.
    pub fn query_count(&self) -> Result<usize, StoreError> {
        self.count_table("case_query")
    }

    /// Number of rows in `case_result`.
    pub fn result_count(&self) -> Result<usize, StoreError> {
        self.count_table("case_result")
    }

    fn count_table(&self, table: &str) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let sql = format!("SELECT count(*)::BIGINT FROM {table}");
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl QueryLog for DuckStore {
    fn record(&self, query: NewQuery) -> Result<Query, StoreError> {
        let conn = self.lock()?;
        let id: i64 = conn.query_row("SELECT nextval('case_query_id_seq')", [], |row| {
            row.get(0)
        })?;
        let queried_at = Utc::now();
        conn.execute(
            "INSERT INTO case_query (id, case_type, case_number, filing_year, source, \
             queried_at_us, status) VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                query.key.case_type,
                query.key.case_number,
                query.key.filing_year,
                query.source,
                queried_at.timestamp_micros(),
                QueryStatus::Pending.as_str(),
            ],
        )?;
        info!(id, key = %query.key, "recorded query");

        // Read back so the caller sees the stored (microsecond) timestamp.
        select_query(&conn, id)?.ok_or(StoreError::QueryNotFound(id))
    }

    fn complete(&self, query_id: i64, outcome: &Outcome) -> Result<Query, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let current = select_query(&tx, query_id)?.ok_or(StoreError::QueryNotFound(query_id))?;
        if current.status != QueryStatus::Pending {
            return Err(StoreError::AlreadyCompleted(query_id));
        }

        let raw_response = match outcome {
            Outcome::Success(found) => Some(found.raw_text()?),
            Outcome::NotFound | Outcome::Failure(_) => None,
        };
        tx.execute(
            "UPDATE case_query SET status = ?, error_message = ?, raw_response = ? WHERE id = ?",
            params![
                outcome.status().as_str(),
                outcome.error_message(&current.key),
                raw_response,
                query_id,
            ],
        )?;

        if let Outcome::Success(found) = outcome {
            let details = &found.details;
            let result_id: i64 =
                tx.query_row("SELECT nextval('case_result_id_seq')", [], |row| row.get(0))?;
            tx.execute(
                &format!(
                    "INSERT INTO case_result ({RESULT_COLUMNS}) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    result_id,
                    query_id,
                    details.petitioner_name,
                    details.respondent_name,
                    details.filing_date.map(|d| d.to_string()),
                    details.next_hearing_date.map(|d| d.to_string()),
                    details.case_status,
                    details.judge_name,
                    serde_json::to_string(&details.document_links)?,
                    Utc::now().timestamp_micros(),
                ],
            )?;
        }

        let updated = select_query(&tx, query_id)?.ok_or(StoreError::QueryNotFound(query_id))?;
        tx.commit()?;
        info!(id = query_id, status = %updated.status, "completed query");
        Ok(updated)
    }

    fn history(&self, limit: usize) -> Result<Vec<Query>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {QUERY_COLUMNS} FROM case_query ORDER BY queried_at_us DESC, id DESC LIMIT ?"
        ))?;
        // DuckDB takes a signed LIMIT; anything past i64::MAX means "all".
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], QueryRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(QueryRow::into_query).collect()
    }

    fn result_for(&self, query_id: i64) -> Result<Option<CaseResult>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RESULT_COLUMNS} FROM case_result WHERE query_id = ?"
        ))?;
        let rows = stmt
            .query_map(params![query_id], ResultRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().next().map(ResultRow::into_result).transpose()
    }
}

fn select_query(conn: &Connection, id: i64) -> Result<Option<Query>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {QUERY_COLUMNS} FROM case_query WHERE id = ?"
    ))?;
    let rows = stmt
        .query_map(params![id], QueryRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().next().map(QueryRow::into_query).transpose()
}

// ── Row mapping ──

struct QueryRow {
    id: i64,
    case_type: String,
    case_number: String,
    filing_year: i32,
    source: Option<String>,
    queried_at_us: i64,
    status: String,
    error_message: Option<String>,
    raw_response: Option<String>,
}

impl QueryRow {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            case_type: row.get(1)?,
            case_number: row.get(2)?,
            filing_year: row.get(3)?,
            source: row.get(4)?,
            queried_at_us: row.get(5)?,
            status: row.get(6)?,
            error_message: row.get(7)?,
            raw_response: row.get(8)?,
        })
    }

    fn into_query(self) -> Result<Query, StoreError> {
        let status = QueryStatus::parse(&self.status).ok_or_else(|| StoreError::Corrupt {
            table: "case_query",
            detail: format!("unknown status {:?} on query {}", self.status, self.id),
        })?;
        Ok(Query {
            id: self.id,
            key: CaseKey::new(self.case_type, self.case_number, self.filing_year),
            source: self.source,
            queried_at: from_micros("case_query", self.queried_at_us)?,
            status,
            error_message: self.error_message,
            raw_response: self.raw_response,
        })
    }
}

struct ResultRow {
    id: i64,
    query_id: i64,
    petitioner_name: Option<String>,
    respondent_name: Option<String>,
    filing_date: Option<String>,
    next_hearing_date: Option<String>,
    case_status: Option<String>,
    judge_name: Option<String>,
    document_links: String,
    created_at_us: i64,
}

impl ResultRow {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            query_id: row.get(1)?,
            petitioner_name: row.get(2)?,
            respondent_name: row.get(3)?,
            filing_date: row.get(4)?,
            next_hearing_date: row.get(5)?,
            case_status: row.get(6)?,
            judge_name: row.get(7)?,
            document_links: row.get(8)?,
            created_at_us: row.get(9)?,
        })
    }

    fn into_result(self) -> Result<CaseResult, StoreError> {
        Ok(CaseResult {
            id: self.id,
            query_id: self.query_id,
            details: CaseDetails {
                petitioner_name: self.petitioner_name,
                respondent_name: self.respondent_name,
                filing_date: parse_date(self.filing_date)?,
                next_hearing_date: parse_date(self.next_hearing_date)?,
                case_status: self.case_status,
                judge_name: self.judge_name,
                document_links: serde_json::from_str(&self.document_links)?,
            },
            created_at: from_micros("case_result", self.created_at_us)?,
        })
    }
}

fn from_micros(table: &'static str, us: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_micros(us).ok_or_else(|| StoreError::Corrupt {
        table,
        detail: format!("timestamp {us} out of range"),
    })
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, StoreError> {
    value
        .map(|s| {
            s.parse::<NaiveDate>().map_err(|e| StoreError::Corrupt {
                table: "case_result",
                detail: format!("bad date {s:?}: {e}"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseview_core::{CaseFound, CaseTable, LookupFailure};

    fn new_query(case_type: &str, number: &str, year: i32) -> NewQuery {
        NewQuery {
            key: CaseKey::new(case_type, number, year),
            source: Some("Delhi High Court".into()),
        }
    }

    fn kesavananda() -> Outcome {
        let table = CaseTable::seeded();
        let record = table.get(&CaseKey::new("WP", "135", 1970)).unwrap();
        Outcome::Success(Box::new(CaseFound::from_record(record)))
    }

    #[test]
    fn open_in_memory_creates_tables() {
        let store = DuckStore::open().unwrap();
        assert_eq!(store.query_count().unwrap(), 0);
        assert_eq!(store.result_count().unwrap(), 0);
    }

    #[test]
    fn record_is_pending() {
        let store = DuckStore::open().unwrap();
        let query = store.record(new_query("WP", "135", 1970)).unwrap();
        assert_eq!(query.status, QueryStatus::Pending);
        assert_eq!(query.key, CaseKey::new("WP", "135", 1970));
        assert_eq!(query.source.as_deref(), Some("Delhi High Court"));
        assert_eq!(store.query_count().unwrap(), 1);
    }

    #[test]
    fn success_writes_one_linked_result() {
        let store = DuckStore::open().unwrap();
        let query = store.record(new_query("WP", "135", 1970)).unwrap();
        let done = store.complete(query.id, &kesavananda()).unwrap();
        assert_eq!(done.status, QueryStatus::Success);
        assert!(done.error_message.is_none());
        assert!(done.raw_response.unwrap().contains("Kesavananda"));

        assert_eq!(store.result_count().unwrap(), 1);
        let result = store.result_for(query.id).unwrap().unwrap();
        assert_eq!(result.query_id, query.id);
        assert_eq!(
            result.details.petitioner_name.as_deref(),
            Some("Kesavananda Bharati Sripadagalvaru")
        );
        assert_eq!(result.details.filing_date, NaiveDate::from_ymd_opt(1970, 3, 15));
        assert!(result.details.document_links.is_empty());
    }

    #[test]
    fn document_links_round_trip() {
        let store = DuckStore::open().unwrap();
        let query = store.record(new_query("CS", "1234", 2020)).unwrap();
        let outcome = Outcome::Success(Box::new(CaseFound {
            details: CaseDetails {
                document_links: vec!["http://example.com/order1.pdf".into()],
                ..Default::default()
            },
            record: None,
            raw_response: Some("raw".into()),
        }));
        let done = store.complete(query.id, &outcome).unwrap();
        assert_eq!(done.raw_response.as_deref(), Some("raw"));
        let result = store.result_for(query.id).unwrap().unwrap();
        assert_eq!(result.details.document_links, vec!["http://example.com/order1.pdf"]);
    }

    #[test]
    fn failure_writes_no_result() {
        let store = DuckStore::open().unwrap();
        let query = store.record(new_query("WP", "135", 1970)).unwrap();
        let outcome = Outcome::Failure(LookupFailure::new(
            "Court website scraping is currently unavailable.",
        ));
        let done = store.complete(query.id, &outcome).unwrap();
        assert_eq!(done.status, QueryStatus::Failed);
        assert!(done.raw_response.is_none());
        assert_eq!(store.result_count().unwrap(), 0);
        assert!(store.result_for(query.id).unwrap().is_none());
    }

    #[test]
    fn second_completion_rejected() {
        let store = DuckStore::open().unwrap();
        let query = store.record(new_query("WP", "135", 1970)).unwrap();
        store.complete(query.id, &Outcome::NotFound).unwrap();
        let err = store.complete(query.id, &kesavananda()).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyCompleted(_)));
        assert_eq!(store.result_count().unwrap(), 0);
        let history = store.history(1).unwrap();
        assert_eq!(history[0].status, QueryStatus::Failed);
    }

    #[test]
    fn complete_unknown_query() {
        let store = DuckStore::open().unwrap();
        let err = store.complete(7, &Outcome::NotFound).unwrap_err();
        assert!(matches!(err, StoreError::QueryNotFound(7)));
    }

    #[test]
    fn history_empty() {
        let store = DuckStore::open().unwrap();
        assert!(store.history(50).unwrap().is_empty());
    }

    #[test]
    fn history_descending_and_capped() {
        let store = DuckStore::open().unwrap();
        for n in 0..55 {
            store.record(new_query("WP", &format!("{}", 100 + n), 2000)).unwrap();
        }
        let recent = store.history(50).unwrap();
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].key.case_number, "154");
        for pair in recent.windows(2) {
            assert!((pair[0].queried_at, pair[0].id) > (pair[1].queried_at, pair[1].id));
        }
    }

    #[test]
    fn history_unbounded_limit() {
        let store = DuckStore::open().unwrap();
        for n in 0..3 {
            store.record(new_query("WP", &format!("{}", 100 + n), 2000)).unwrap();
        }
        assert_eq!(store.history(usize::MAX).unwrap().len(), 3);
    }

    #[test]
    fn concurrent_record_and_complete() {
        let store = std::sync::Arc::new(DuckStore::open().unwrap());
        let workers: Vec<_> = (0..4)
            .map(|w| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..10 {
                        let number = format!("{}{:02}", w + 1, n);
                        let query = store.record(new_query("WP", &number, 2000)).unwrap();
                        store.complete(query.id, &Outcome::NotFound).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let history = store.history(usize::MAX).unwrap();
        assert_eq!(history.len(), 40);
        let ids: std::collections::HashSet<i64> = history.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 40);
        assert!(history.iter().all(|q| q.status == QueryStatus::Failed));
    }

    #[test]
    fn failed_query_visible_in_history() {
        let store = DuckStore::open().unwrap();
        let query = store.record(new_query("WP", "135", 1970)).unwrap();
        store
            .complete(query.id, &Outcome::Failure(LookupFailure::new("unavailable")))
            .unwrap();
        let history = store.history(50).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, QueryStatus::Failed);
        assert_eq!(history[0].error_message.as_deref(), Some("unavailable"));
    }

    // ── Persistent storage tests ──

    #[test]
    fn open_persistent_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("queries.duckdb");
        assert!(!db_path.exists());

        let store = DuckStore::open_persistent(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(store.query_count().unwrap(), 0);
    }

    #[test]
    fn persistent_log_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("queries.duckdb");

        let store = DuckStore::open_persistent(&db_path).unwrap();
        let first = store.record(new_query("WP", "135", 1970)).unwrap();
        store.complete(first.id, &kesavananda()).unwrap();
        drop(store);

        // Sequences continue after reopen, so ids stay unique.
        let store = DuckStore::open_persistent(&db_path).unwrap();
        assert_eq!(store.query_count().unwrap(), 1);
        assert_eq!(store.result_count().unwrap(), 1);
        let second = store.record(new_query("CA", "887", 1975)).unwrap();
        assert_ne!(second.id, first.id);

        let history = store.history(50).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert!(store.result_for(first.id).unwrap().is_some());
    }
}
