use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no query with id {0}")]
    QueryNotFound(i64),

    #[error("query {0} has already been completed")]
    AlreadyCompleted(i64),

    #[error("corrupt row in {table}: {detail}")]
    Corrupt { table: &'static str, detail: String },

    #[error("query log lock poisoned")]
    Poisoned,

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
