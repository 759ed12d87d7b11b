pub mod case;
pub mod catalog;
pub mod validate;

pub use case::{
    CaseDetails, CaseFound, CaseKey, CaseRecord, CaseResult, LookupFailure, NewQuery, Outcome,
    Query, QueryStatus,
};
pub use catalog::{CASE_TYPES, CaseTable, CaseTypeInfo};
pub use validate::{MIN_FILING_YEAR, SearchInput, ValidationError, validate, validate_case_number};
