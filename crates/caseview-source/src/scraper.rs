//! Court website scraper.
//!
//! Only the placeholder exists: real court sites sit behind CAPTCHAs and
//! session handling, so every lookup reports the source as unavailable.

use async_trait::async_trait;
use caseview_core::{CaseKey, LookupFailure, Outcome};
use tracing::{info, warn};

use crate::CaseSource;

const UNAVAILABLE: &str = "Court website scraping is currently unavailable. This demonstration \
    shows the interface and database logging functionality. Real implementation would require \
    handling CAPTCHA verification, session management, and compliance with court website terms \
    of service.";

/// A court the lookup form can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Court {
    pub name: &'static str,
    pub url: &'static str,
    pub status: &'static str,
}

const COURTS: &[Court] = &[
    Court {
        name: "Delhi High Court",
        url: "https://delhihighcourt.nic.in",
        status: "demo_only",
    },
    Court {
        name: "District Courts - Faridabad",
        url: "https://districts.ecourts.gov.in/faridabad",
        status: "demo_only",
    },
];

/// Courts with a (placeholder) scraper.
pub fn available_courts() -> &'static [Court] {
    COURTS
}

/// Scraper for a single court's case-status page.
#[derive(Debug, Clone)]
pub struct CourtScraper {
    court: Court,
}

impl Default for CourtScraper {
    fn default() -> Self {
        Self { court: COURTS[0] }
    }
}

impl CourtScraper {
    pub fn new(court: Court) -> Self {
        Self { court }
    }

    pub fn court(&self) -> &Court {
        &self.court
    }
}

#[async_trait]
impl CaseSource for CourtScraper {
    fn name(&self) -> &str {
        self.court.name
    }

    async fn lookup(&self, key: &CaseKey) -> Outcome {
        info!(court = self.court.name, %key, "attempting court lookup");
        warn!(url = self.court.url, "court scraping not available");
        Outcome::Failure(LookupFailure {
            reason: UNAVAILABLE.to_string(),
            source: Some(self.court.url.to_string()),
            reference: Some(key.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_lookup_fails() {
        let scraper = CourtScraper::default();
        let keys = [
            CaseKey::new("WP", "135", 1970),
            CaseKey::new("CS", "1234", 2020),
            CaseKey::new("XYZ", "000", 1950),
        ];
        for key in &keys {
            for _ in 0..3 {
                match scraper.lookup(key).await {
                    Outcome::Failure(failure) => {
                        assert!(!failure.reason.is_empty());
                        assert_eq!(
                            failure.source.as_deref(),
                            Some("https://delhihighcourt.nic.in")
                        );
                        assert_eq!(failure.reference, Some(key.to_string()));
                    }
                    other => panic!("expected failure, got {other:?}"),
                }
            }
        }
    }

    #[tokio::test]
    async fn failure_names_attempted_court() {
        let court = available_courts()[1];
        let scraper = CourtScraper::new(court);
        assert_eq!(scraper.name(), "District Courts - Faridabad");
        let Outcome::Failure(failure) = scraper.lookup(&CaseKey::new("CA", "887", 1975)).await
        else {
            panic!("expected failure");
        };
        assert_eq!(failure.source.as_deref(), Some(court.url));
    }

    #[test]
    fn courts_are_demo_only() {
        assert_eq!(available_courts().len(), 2);
        assert!(available_courts().iter().all(|c| c.status == "demo_only"));
        assert_eq!(CourtScraper::default().court().name, "Delhi High Court");
    }
}
