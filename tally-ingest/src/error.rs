//! Whole-parse failures.
//!
//! Per-block problems are not errors: they become [`Diagnostic`] entries on
//! the returned statement and parsing carries on.
//!
//! [`Diagnostic`]: crate::types::Diagnostic
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported statement format \"{0}\"")]
    FormatUnsupported(String),
    #[error("no transactions found ({blocks_rejected} candidate blocks rejected)")]
    NoTransactionsFound { blocks_rejected: usize },
    #[error("invalid format profile \"{id}\": {reason}")]
    InvalidFormat { id: String, reason: String },
    #[error("unreadable CSV export: {0}")]
    Csv(String),
}
