//! tally-ingest: rebuild an ordered transaction ledger from extracted bank
//! statement text.
//!
//! Pipeline, in order: line classification, block aggregation, amount
//! extraction, category tagging, credit/debit classification, fee splitting,
//! reference generation and chronological reconstruction. Every parse is a
//! pure function of (lines, format); no state survives between calls.
//!
//! Online-banking CSV exports go through [`parse_csv`] and share the
//! reference and ordering stages.

pub mod amounts;
pub mod bank_csv;
pub mod block;
pub mod category;
pub mod chronology;
pub mod classify;
pub mod direction;
pub mod error;
pub mod fee;
pub mod formats;
pub mod info;
pub mod pipeline;
pub mod reference;
pub mod types;

pub use error::ParseError;
pub use formats::{DatePattern, Format, FormatProfile, FormatRegistry, ThreeAmountRule, TwoAmountRule};
pub use bank_csv::parse_csv_with_format;
pub use pipeline::{StatementParser, parse, parse_csv, parse_with_format};
pub use types::{
    Diagnostic, DiagnosticKind, Direction, ParsedStatement, ParsedTransaction, RawLine,
    StatementInfo, StatementPeriod,
};
