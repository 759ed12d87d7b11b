//! Static table of landmark Indian court cases, and the case-type codes the
//! search form offers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::{CaseDetails, CaseKey, CaseRecord};

/// A case-type code and its long name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseTypeInfo {
    pub code: &'static str,
    pub description: &'static str,
}

pub const CASE_TYPES: &[CaseTypeInfo] = &[
    CaseTypeInfo {
        code: "WP",
        description: "Writ Petition",
    },
    CaseTypeInfo {
        code: "CA",
        description: "Civil Appeal",
    },
    CaseTypeInfo {
        code: "CRL",
        description: "Criminal Appeal",
    },
    CaseTypeInfo {
        code: "CS",
        description: "Civil Suit",
    },
    CaseTypeInfo {
        code: "SLP",
        description: "Special Leave Petition",
    },
    CaseTypeInfo {
        code: "TP",
        description: "Transfer Petition",
    },
];

/// Read-only mapping from [`CaseKey`] to [`CaseRecord`].
#[derive(Debug, Clone, Default)]
pub struct CaseTable {
    records: BTreeMap<CaseKey, CaseRecord>,
}

impl CaseTable {
    pub fn new(records: impl IntoIterator<Item = CaseRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.key.clone(), record))
            .collect();
        Self { records }
    }

    /// The built-in table of public-domain cases.
    pub fn seeded() -> Self {
        let table = Self::new(seed_records());
        debug!(count = table.len(), "seeded static case table");
        table
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &CaseKey) -> Option<&CaseRecord> {
        self.records.get(key)
    }

    /// All records, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &CaseRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

struct Seed {
    case_type: &'static str,
    case_number: &'static str,
    filing_year: i32,
    petitioner: &'static str,
    respondent: &'static str,
    filed: Option<NaiveDate>,
    decided: Option<NaiveDate>,
    next_hearing: Option<NaiveDate>,
    status: &'static str,
    bench: &'static str,
    court: &'static str,
    significance: &'static str,
    citation: &'static str,
    pdf_available: bool,
}

impl From<Seed> for CaseRecord {
    fn from(s: Seed) -> Self {
        CaseRecord {
            key: CaseKey::new(s.case_type, s.case_number, s.filing_year),
            court_name: s.court.into(),
            details: CaseDetails {
                petitioner_name: Some(s.petitioner.into()),
                respondent_name: Some(s.respondent.into()),
                filing_date: s.filed,
                next_hearing_date: s.next_hearing,
                case_status: Some(s.status.into()),
                judge_name: Some(s.bench.into()),
                document_links: Vec::new(),
            },
            citation: s.citation.into(),
            significance: s.significance.into(),
            decision_date: s.decided,
            pdf_available: s.pdf_available,
        }
    }
}

const SUPREME_COURT: &str = "Supreme Court of India";

fn seed_records() -> Vec<CaseRecord> {
    vec![
        Seed {
            case_type: "WP",
            case_number: "135",
            filing_year: 1970,
            petitioner: "Kesavananda Bharati Sripadagalvaru",
            respondent: "State of Kerala and Anr",
            filed: date(1970, 3, 15),
            decided: date(1973, 4, 24),
            next_hearing: None,
            status: "Decided",
            bench: "13-Judge Constitutional Bench",
            court: SUPREME_COURT,
            significance: "Established the Basic Structure Doctrine - Parliament cannot amend the Constitution's basic structure",
            citation: "AIR 1973 SC 1461",
            pdf_available: true,
        },
        Seed {
            case_type: "WP",
            case_number: "494",
            filing_year: 2012,
            petitioner: "Justice K.S. Puttaswamy (Retd.) and Others",
            respondent: "Union of India and Others",
            filed: date(2012, 12, 13),
            decided: date(2017, 8, 24),
            next_hearing: None,
            status: "Decided",
            bench: "9-Judge Constitutional Bench",
            court: SUPREME_COURT,
            significance: "Established fundamental right to privacy under Article 21",
            citation: "AIR 2017 SC 4161",
            pdf_available: true,
        },
        Seed {
            case_type: "CA",
            case_number: "887",
            filing_year: 1975,
            petitioner: "Indira Nehru Gandhi",
            respondent: "Raj Narain",
            filed: date(1975, 6, 12),
            decided: date(1975, 11, 7),
            next_hearing: None,
            status: "Decided",
            bench: "5-Judge Constitutional Bench",
            court: SUPREME_COURT,
            significance: "Applied basic structure doctrine; established free and fair elections as basic structure",
            citation: "AIR 1975 SC 2299",
            pdf_available: true,
        },
        Seed {
            case_type: "WP",
            case_number: "597",
            filing_year: 1978,
            petitioner: "Maneka Gandhi",
            respondent: "Union of India",
            filed: date(1978, 1, 10),
            decided: date(1978, 1, 25),
            next_hearing: None,
            status: "Decided",
            bench: "Justice Bhagwati, Justice Untwalia, Justice Fazal Ali, Justice Pathak",
            court: SUPREME_COURT,
            significance: "Expanded Article 21 - right to life includes right to live with dignity",
            citation: "AIR 1978 SC 597",
            pdf_available: true,
        },
        Seed {
            case_type: "WP",
            case_number: "3011",
            filing_year: 1997,
            petitioner: "Vishaka and Others",
            respondent: "State of Rajasthan and Others",
            filed: date(1997, 6, 15),
            decided: date(1997, 8, 13),
            next_hearing: None,
            status: "Decided",
            bench: "Justice Verma, Justice Sujata Manohar, Justice B.N. Kirpal",
            court: SUPREME_COURT,
            significance: "Sexual harassment guidelines; judicial legislation in absence of statutory law",
            citation: "AIR 1997 SC 3011",
            pdf_available: true,
        },
        Seed {
            case_type: "CRL",
            case_number: "76",
            filing_year: 2016,
            petitioner: "Navtej Singh Johar and Others",
            respondent: "Union of India",
            filed: date(2016, 2, 15),
            decided: date(2018, 9, 6),
            next_hearing: None,
            status: "Decided",
            bench: "5-Judge Constitutional Bench",
            court: SUPREME_COURT,
            significance: "Decriminalized homosexuality; read down Section 377 IPC",
            citation: "AIR 2018 SC 4321",
            pdf_available: true,
        },
        Seed {
            case_type: "CA",
            case_number: "477",
            filing_year: 1992,
            petitioner: "Indra Sawhney and Others",
            respondent: "Union of India (Mandal Commission Case)",
            filed: date(1990, 8, 13),
            decided: date(1992, 11, 16),
            next_hearing: None,
            status: "Decided",
            bench: "9-Judge Constitutional Bench",
            court: SUPREME_COURT,
            significance: "Upheld reservation for OBCs; established 50% ceiling on reservations",
            citation: "AIR 1993 SC 477",
            pdf_available: true,
        },
        Seed {
            case_type: "CS",
            case_number: "1234",
            filing_year: 2020,
            petitioner: "ABC Corporation Ltd.",
            respondent: "XYZ Industries Pvt. Ltd.",
            filed: date(2020, 3, 15),
            decided: None,
            next_hearing: date(2024, 12, 20),
            status: "Pending",
            bench: "Justice Sample Name",
            court: "Delhi High Court",
            significance: "Commercial dispute regarding breach of contract",
            citation: "CS 1234/2020 Del HC",
            pdf_available: false,
        },
    ]
    .into_iter()
    .map(CaseRecord::from)
    .collect()
}
