//! Online-banking CSV exports.
//!
//! One record per transaction, columns matched by (trimmed) header name:
//!
//!   Transaction Date,Posting Date,Description,Debits,Credits,Balance,Bank account
//!   2025/09/23,2025/09/24,Checkers Sandton,-150.00,,"R1,850.00",1234567890
//!
//! Debits and credits sit in separate columns, so direction comes from the
//! column rather than the lexicon. Money cells may carry an `R` prefix,
//! thousands commas, spaces and a sign; `-` marks an empty cell. Rows come out
//! through the same reference and ordering stages as statement text.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::chronology::{self, Group};
use crate::error::ParseError;
use crate::formats::Format;
use crate::pipeline::assign_references;
use crate::reference::Positions;
use crate::types::{Diagnostic, DiagnosticKind, Direction, Draft, ParsedStatement, StatementInfo};

const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Transaction Date")]
    transaction_date: Option<String>,
    #[serde(rename = "Posting Date")]
    posting_date: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Debits")]
    debits: Option<String>,
    #[serde(rename = "Credits")]
    credits: Option<String>,
    #[serde(rename = "Balance")]
    balance: Option<String>,
    #[serde(rename = "Bank account")]
    bank_account: Option<String>,
}

fn csv_error(e: csv::Error) -> ParseError {
    ParseError::Csv(e.to_string())
}

/// Export date in any of the usual layouts, then the format's own grammars.
fn parse_date(raw: &str, format: &Format) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| format.parse_date(raw))
}

/// Signed money cell; `None` for an empty or `-` cell.
fn parse_money(raw: Option<&str>) -> Option<Decimal> {
    let cleaned: String = raw?
        .chars()
        .filter(|c| !matches!(c, 'R' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    match cleaned.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(cell = %cleaned, "unparseable amount cell");
            None
        }
    }
}

/// Draft for one row. `Ok(None)` for rows that are not transactions at all
/// (blank or repeated headers).
fn read_row(row: &CsvRow, line: usize, format: &Format) -> Result<Option<Draft>, DiagnosticKind> {
    let description = row.description.as_deref().unwrap_or_default().trim();
    if description.chars().count() < 2
        || description.contains("Transaction Date")
        || description == "Description"
    {
        return Ok(None);
    }

    let Some(raw_date) = row
        .transaction_date
        .as_deref()
        .or(row.posting_date.as_deref())
    else {
        return Ok(None);
    };
    let date = parse_date(raw_date, format).ok_or_else(|| DiagnosticKind::MalformedDate {
        token: raw_date.to_string(),
    })?;

    let debit = parse_money(row.debits.as_deref());
    let credit = parse_money(row.credits.as_deref());
    if debit.is_none() && credit.is_none() {
        return Err(DiagnosticKind::NoAmounts);
    }
    let net = credit.unwrap_or_default().abs() - debit.unwrap_or_default().abs();
    let direction = if net > Decimal::ZERO {
        Direction::Credit
    } else if net < Decimal::ZERO {
        Direction::Debit
    } else {
        return Err(DiagnosticKind::ZeroAmount);
    };

    Ok(Some(Draft {
        line,
        date,
        description: description.to_string(),
        amount: net.abs(),
        direction,
        category: format
            .categories()
            .first_in(&[description])
            .map(str::to_string),
        fee: Decimal::ZERO,
        balance: parse_money(row.balance.as_deref()).map(|b| b.abs()),
    }))
}

fn record_line(record: &StringRecord, index: usize) -> usize {
    record
        .position()
        .map_or(index + 1, |p| (p.line() as usize).saturating_sub(1))
}

/// Parse a CSV export with an already compiled format.
///
/// The format supplies the reference prefix, the category vocabulary and
/// fallback date grammars. A missing date column or an unreadable header is
/// an error; a bad record only becomes a diagnostic.
pub fn parse_csv_with_format<R: Read>(
    reader: R,
    format: &Format,
) -> Result<ParsedStatement, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    if !headers
        .iter()
        .any(|h| h == "Transaction Date" || h == "Posting Date")
    {
        return Err(ParseError::Csv(
            "no Transaction Date or Posting Date column".to_string(),
        ));
    }

    let mut info = StatementInfo::default();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut positions = Positions::default();
    let mut groups: Vec<Group> = Vec::new();

    for (index, record) in rdr.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let diag = Diagnostic::new(
                    index + 1,
                    DiagnosticKind::UnreadableRow {
                        reason: e.to_string(),
                    },
                    "",
                );
                warn!(line = diag.line + 1, reason = %diag.kind, "skipping row");
                diagnostics.push(diag);
                continue;
            }
        };
        let line = record_line(&record, index);
        let excerpt = record.iter().collect::<Vec<_>>().join(",");

        let outcome = record
            .deserialize::<CsvRow>(Some(&headers))
            .map_err(|e| DiagnosticKind::UnreadableRow {
                reason: e.to_string(),
            })
            .and_then(|row| {
                if info.account_number.is_none() {
                    info.account_number = row
                        .bank_account
                        .as_deref()
                        .map(str::trim)
                        .filter(|a| !a.is_empty())
                        .map(str::to_string);
                }
                read_row(&row, line, format)
            });

        match outcome {
            Ok(Some(draft)) => groups.push(Group {
                date: draft.date,
                balance: draft.balance,
                transactions: assign_references(vec![draft], format, &mut positions),
            }),
            Ok(None) => {}
            Err(kind) => {
                let diag = Diagnostic::new(line, kind, &excerpt);
                warn!(line = diag.line + 1, reason = %diag.kind, "skipping row");
                diagnostics.push(diag);
            }
        }
    }

    if groups.is_empty() {
        warn!(format = format.id(), rejected = diagnostics.len(), "no transactions found");
        return Err(ParseError::NoTransactionsFound {
            blocks_rejected: diagnostics.len(),
        });
    }

    let transactions = chronology::reconstruct(groups);
    info!(
        format = format.id(),
        transactions = transactions.len(),
        rejected = diagnostics.len(),
        "parsed CSV export"
    );

    Ok(ParsedStatement::new(format.id(), info, transactions, diagnostics))
}
