//! Case lookup types shared by the validator, the lookup service, and the query log.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Structured identity of a court case.
///
/// Two keys are equal only when all three parts are equal, so a case number
/// containing separators (e.g. `"12_2020"`) can never collide with another key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseKey {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: i32,
}

impl CaseKey {
    pub fn new(
        case_type: impl Into<String>,
        case_number: impl Into<String>,
        filing_year: i32,
    ) -> Self {
        Self {
            case_type: case_type.into(),
            case_number: case_number.into(),
            filing_year,
        }
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.case_type, self.case_number, self.filing_year)
    }
}

/// Normalised case data, as stored in a [`CaseResult`] or carried by a [`CaseRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDetails {
    pub petitioner_name: Option<String>,
    pub respondent_name: Option<String>,
    pub filing_date: Option<NaiveDate>,
    pub next_hearing_date: Option<NaiveDate>,
    pub case_status: Option<String>,
    pub judge_name: Option<String>,
    #[serde(default)]
    pub document_links: Vec<String>,
}

/// A read-only entry of the static case table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub key: CaseKey,
    pub court_name: String,
    pub details: CaseDetails,
    pub citation: String,
    pub significance: String,
    pub decision_date: Option<NaiveDate>,
    pub pdf_available: bool,
}

/// Lifecycle state of a logged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Pending,
    Success,
    Failed,
}

impl QueryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query about to be logged. The log assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewQuery {
    pub key: CaseKey,
    /// Court or data source the lookup is attempted against.
    pub source: Option<String>,
}

/// One logged lookup attempt.
///
/// Only `status`, `error_message` and `raw_response` ever change, and only once,
/// when the lookup completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub id: i64,
    pub key: CaseKey,
    pub source: Option<String>,
    pub queried_at: DateTime<Utc>,
    pub status: QueryStatus,
    pub error_message: Option<String>,
    pub raw_response: Option<String>,
}

/// Case data produced by a successful lookup, linked to exactly one [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    pub id: i64,
    pub query_id: i64,
    pub details: CaseDetails,
    pub created_at: DateTime<Utc>,
}

/// Payload of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFound {
    pub details: CaseDetails,
    /// The full static-table entry, when the static strategy answered.
    pub record: Option<CaseRecord>,
    /// Opaque response text from an external source.
    pub raw_response: Option<String>,
}

impl CaseFound {
    pub fn from_record(record: &CaseRecord) -> Self {
        Self {
            details: record.details.clone(),
            record: Some(record.clone()),
            raw_response: None,
        }
    }

    /// Text stored as the query's `raw_response`: the source's own text when
    /// present, otherwise the details as JSON.
    pub fn raw_text(&self) -> Result<String, serde_json::Error> {
        match &self.raw_response {
            Some(raw) => Ok(raw.clone()),
            None => serde_json::to_string(&self.details),
        }
    }
}

/// Why a lookup against an external source failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub reason: String,
    /// Identifier (usually a URL) of the source that was attempted.
    pub source: Option<String>,
    /// Source-side reference for the case that was asked for.
    pub reference: Option<String>,
}

impl LookupFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
            reference: None,
        }
    }
}

/// Tagged result of a lookup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Box<CaseFound>),
    NotFound,
    Failure(LookupFailure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Status the owning query takes once this outcome is logged.
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Success(_) => QueryStatus::Success,
            Self::NotFound | Self::Failure(_) => QueryStatus::Failed,
        }
    }

    /// Error message logged against the query, `None` on success.
    pub fn error_message(&self, key: &CaseKey) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::NotFound => Some(format!("No case found for {key}")),
            Self::Failure(failure) => Some(failure.reason.clone()),
        }
    }
}
