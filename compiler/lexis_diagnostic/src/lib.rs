//! Diagnostic codes for the lexis phases.
//!
//! Error values live next to the phase that raises them (`lexis_scope`,
//! `lexis_eval`); this crate only owns the shared code catalogue so that
//! both families are searchable under one numbering scheme.

mod error_code;

pub use error_code::ErrorCode;
