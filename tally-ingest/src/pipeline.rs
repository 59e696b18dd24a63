//! The parse entry points: lines + format id in, ordered ledger out.

use std::io::Read;

use tracing::{debug, info, warn};

use crate::amounts;
use crate::bank_csv;
use crate::block::{self, Aggregated, Block};
use crate::category;
use crate::chronology::{self, Group};
use crate::direction;
use crate::error::ParseError;
use crate::fee;
use crate::formats::{Format, FormatRegistry};
use crate::info as header;
use crate::reference::{self, Positions};
use crate::types::{
    Diagnostic, DiagnosticKind, Draft, ParsedStatement, ParsedTransaction, RawLine,
};

/// Parser bound to a registry of formats.
#[derive(Debug, Clone)]
pub struct StatementParser {
    registry: FormatRegistry,
}

impl StatementParser {
    pub fn new(registry: FormatRegistry) -> Self {
        Self { registry }
    }

    /// Parser over the built-in formats.
    pub fn builtin() -> Result<Self, ParseError> {
        Ok(Self::new(FormatRegistry::builtin()?))
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn parse<S: AsRef<str>>(
        &self,
        lines: &[S],
        format_id: &str,
    ) -> Result<ParsedStatement, ParseError> {
        let format = self.registry.get(format_id)?;
        parse_with_format(lines, format)
    }

    /// Parse an online-banking CSV export; see [`crate::bank_csv`].
    pub fn parse_csv<R: Read>(
        &self,
        reader: R,
        format_id: &str,
    ) -> Result<ParsedStatement, ParseError> {
        let format = self.registry.get(format_id)?;
        bank_csv::parse_csv_with_format(reader, format)
    }
}

/// Parse with the built-in formats.
pub fn parse<S: AsRef<str>>(lines: &[S], format_id: &str) -> Result<ParsedStatement, ParseError> {
    StatementParser::builtin()?.parse(lines, format_id)
}

/// Parse a CSV export with the built-in formats.
pub fn parse_csv<R: Read>(reader: R, format_id: &str) -> Result<ParsedStatement, ParseError> {
    StatementParser::builtin()?.parse_csv(reader, format_id)
}

/// Parse with an already compiled format.
pub fn parse_with_format<S: AsRef<str>>(
    lines: &[S],
    format: &Format,
) -> Result<ParsedStatement, ParseError> {
    let raw: Vec<RawLine<'_>> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| RawLine::new(i, l.as_ref()))
        .collect();

    let info = header::extract(&raw, format);
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut positions = Positions::default();
    let mut groups: Vec<Group> = Vec::new();

    for aggregated in block::aggregate(&raw, format) {
        let block = match aggregated {
            Aggregated::Block(block) => block,
            Aggregated::Rejected(diag) => {
                warn!(line = diag.line + 1, reason = %diag.kind, "skipping block");
                diagnostics.push(diag);
                continue;
            }
        };

        let drafts = read_block(&block, format);
        let Some(first) = drafts.first() else {
            let diag = Diagnostic::new(block.line, DiagnosticKind::ZeroAmount, &block.text);
            warn!(line = diag.line + 1, reason = %diag.kind, "skipping block");
            diagnostics.push(diag);
            continue;
        };
        let (date, balance) = (first.date, first.balance);

        groups.push(Group {
            date,
            balance,
            transactions: assign_references(drafts, format, &mut positions),
        });
    }

    if groups.is_empty() {
        warn!(
            format = format.id(),
            rejected = diagnostics.len(),
            "no transactions found"
        );
        return Err(ParseError::NoTransactionsFound {
            blocks_rejected: diagnostics.len(),
        });
    }

    let transactions = chronology::reconstruct(groups);
    info!(
        format = format.id(),
        transactions = transactions.len(),
        rejected = diagnostics.len(),
        "parsed statement"
    );

    Ok(ParsedStatement::new(
        format.id(),
        info,
        transactions,
        diagnostics,
    ))
}

/// Give each draft its reference, logging the finished transaction.
pub(crate) fn assign_references(
    drafts: Vec<Draft>,
    format: &Format,
    positions: &mut Positions,
) -> Vec<ParsedTransaction> {
    drafts
        .into_iter()
        .map(|draft| {
            let position = positions.next(draft.date);
            let reference = reference::reference(format, &draft, position);
            debug!(
                line = draft.line + 1,
                date = %draft.date,
                direction = %draft.direction,
                amount = %draft.amount,
                reference = %reference,
                "{}",
                draft.description
            );
            draft.into_transaction(reference)
        })
        .collect()
}

/// Turn one block into its drafts, fee split applied. Empty when every
/// amount is zero.
fn read_block(block: &Block, format: &Format) -> Vec<Draft> {
    let tokens = amounts::extract(&block.text);
    let (head, tail) = amounts::surrounding_text(&block.text, &tokens);
    let tagged = category::tag(&head, &tail, format);

    let fee_context =
        direction::is_fee_context(&tagged.description, tagged.category.as_deref(), format);
    let Some(partition) = amounts::partition(&tokens, format, fee_context) else {
        return Vec::new();
    };

    let direction = direction::classify_direction(
        &tagged.description,
        tagged.category.as_deref(),
        partition.hint,
        format,
    );

    fee::split(
        Draft {
            line: block.line,
            date: block.date,
            description: tagged.description,
            amount: partition.amount,
            direction,
            category: tagged.category,
            fee: partition.fee,
            balance: partition.balance,
        },
        format,
    )
}
