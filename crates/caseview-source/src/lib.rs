//! Lookup layer: the static case table, external court sources, and the
//! service that picks between them.

pub mod lookup;
pub mod scraper;

pub use lookup::{LookupService, Strategy};
pub use scraper::{Court, CourtScraper, available_courts};

use async_trait::async_trait;
use caseview_core::{CaseKey, Outcome};

/// An external court data source.
///
/// Implementations must report every problem (unavailable site, timeout,
/// unparseable page) as [`Outcome::Failure`] rather than panicking.
#[async_trait]
pub trait CaseSource: Send + Sync {
    /// Human-readable name of the court or data source.
    fn name(&self) -> &str;

    async fn lookup(&self, key: &CaseKey) -> Outcome;
}
