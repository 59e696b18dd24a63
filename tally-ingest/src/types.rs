use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of extracted statement text and its position in the source sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub index: usize,
    pub text: &'a str,
}

impl<'a> RawLine<'a> {
    pub fn new(index: usize, text: &'a str) -> Self {
        Self { index, text }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money received; increases the balance.
    Credit,
    /// Money spent or charged; decreases the balance.
    Debit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction before its reference has been assigned.
///
/// Produced by the amount/type/category stages, split by the fee splitter,
/// then turned into a [`ParsedTransaction`] once its position within the
/// date group is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// Index of the anchor line the transaction was read from.
    pub line: usize,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub direction: Direction,
    pub category: Option<String>,
    pub fee: Decimal,
    pub balance: Option<Decimal>,
}

impl Draft {
    pub fn into_transaction(self, reference: String) -> ParsedTransaction {
        ParsedTransaction {
            date: self.date,
            description: self.description,
            amount: self.amount,
            direction: self.direction,
            category: self.category,
            fee: self.fee,
            balance: self.balance,
            reference,
        }
    }
}

/// Normalized output of the statement parser (bank-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Always a positive magnitude; see `direction` for the sign.
    pub amount: Decimal,
    pub direction: Direction,
    pub category: Option<String>,
    /// Zero on every emitted record; fees are split into their own transaction.
    pub fee: Decimal,
    /// Running balance after this transaction, when the source row carried one.
    pub balance: Option<Decimal>,
    pub reference: String,
}

impl ParsedTransaction {
    /// Positive for credits, negative for debits.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }
}

/// Why a candidate block produced no transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No currency-shaped token anywhere inside the lookahead window.
    NoAmounts,
    /// The anchor looked like a date but is not a real calendar date.
    MalformedDate { token: String },
    /// Amounts were present but every magnitude was zero.
    ZeroAmount,
    /// A CSV record that does not fit the export's columns.
    UnreadableRow { reason: String },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::NoAmounts => f.write_str("no amounts found"),
            DiagnosticKind::MalformedDate { token } => write!(f, "malformed date \"{token}\""),
            DiagnosticKind::ZeroAmount => f.write_str("all amounts are zero"),
            DiagnosticKind::UnreadableRow { reason } => write!(f, "unreadable row: {reason}"),
        }
    }
}

/// A rejected block, kept for observability only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Index of the anchor line that opened the block.
    pub line: usize,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Working text of the block, truncated.
    pub excerpt: String,
}

impl Diagnostic {
    const EXCERPT_CHARS: usize = 80;

    pub fn new(line: usize, kind: DiagnosticKind, text: &str) -> Self {
        Self {
            line,
            kind,
            excerpt: text.chars().take(Self::EXCERPT_CHARS).collect(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line + 1, self.kind, self.excerpt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Header facts found on the statement, all best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementInfo {
    pub account_number: Option<String>,
    pub period: Option<StatementPeriod>,
    pub opening_balance: Option<Decimal>,
    pub closing_balance: Option<Decimal>,
}

/// The ordered ledger returned by a parse. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    format: String,
    info: StatementInfo,
    transactions: Vec<ParsedTransaction>,
    diagnostics: Vec<Diagnostic>,
}

impl ParsedStatement {
    pub(crate) fn new(
        format: impl Into<String>,
        info: StatementInfo,
        transactions: Vec<ParsedTransaction>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            format: format.into(),
            info,
            transactions,
            diagnostics,
        }
    }

    /// Id of the format the statement was parsed with.
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn info(&self) -> &StatementInfo {
        &self.info
    }

    /// Transactions, most recent date first.
    pub fn transactions(&self) -> &[ParsedTransaction] {
        &self.transactions
    }

    /// Blocks that were skipped, in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParsedTransaction> {
        self.transactions.iter()
    }
}

impl<'a> IntoIterator for &'a ParsedStatement {
    type Item = &'a ParsedTransaction;
    type IntoIter = std::slice::Iter<'a, ParsedTransaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
