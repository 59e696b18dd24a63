//! Block aggregation.
//!
//! An anchor line opens a block and pulls up to `lookahead` following lines
//! as continuations. The block is sealed early by the next anchor, by a noise
//! line once an amount has been seen, or by a run of blank lines once an
//! amount has been seen. Noise before the first amount is skipped rather than
//! sealing, so a page break between a wrapped description and its money
//! columns does not lose the transaction.

use chrono::NaiveDate;

use crate::amounts;
use crate::classify::{LineClass, classify};
use crate::formats::Format;
use crate::types::{Diagnostic, DiagnosticKind, RawLine};

/// One candidate transaction: the anchor date and the joined working text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Index of the anchor line.
    pub line: usize,
    pub date: NaiveDate,
    /// Anchor text (date token removed) and continuations, single-spaced.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregated {
    Block(Block),
    Rejected(Diagnostic),
}

/// Walk `lines` and group them into blocks, in discovery order.
pub fn aggregate(lines: &[RawLine<'_>], format: &Format) -> Vec<Aggregated> {
    let lookahead = format.lookahead();
    let blank_run_limit = format.profile().blank_run_limit.max(1);
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let anchor = lines[i];
        let (date, rest) = match classify(anchor, format) {
            LineClass::Anchor { date, rest } => (Ok(date), rest),
            LineClass::MalformedAnchor { token, rest } => (Err(token), rest),
            _ => {
                i += 1;
                continue;
            }
        };

        let mut fragments = vec![rest];
        let mut seen_amount = amounts::contains_amount(rest);
        let mut blanks = 0;
        let mut j = i + 1;

        while j < lines.len() && j - i <= lookahead {
            match classify(lines[j], format) {
                LineClass::Anchor { .. } | LineClass::MalformedAnchor { .. } => break,
                LineClass::Noise if seen_amount => break,
                LineClass::Noise => {}
                LineClass::Blank => {
                    blanks += 1;
                    if seen_amount && blanks >= blank_run_limit {
                        j += 1;
                        break;
                    }
                }
                LineClass::Continuation => {
                    blanks = 0;
                    let text = lines[j].text.trim();
                    seen_amount |= amounts::contains_amount(text);
                    fragments.push(text);
                }
            }
            j += 1;
        }

        let text = join_fragments(&fragments);
        out.push(match date {
            Err(token) => Aggregated::Rejected(Diagnostic::new(
                anchor.index,
                DiagnosticKind::MalformedDate {
                    token: token.to_string(),
                },
                &text,
            )),
            Ok(_) if !seen_amount => {
                Aggregated::Rejected(Diagnostic::new(anchor.index, DiagnosticKind::NoAmounts, &text))
            }
            Ok(date) => Aggregated::Block(Block {
                line: anchor.index,
                date,
                text,
            }),
        });

        i = j;
    }

    out
}

/// Join fragments with single spaces, collapsing inner whitespace runs.
pub(crate) fn join_fragments(fragments: &[&str]) -> String {
    fragments
        .iter()
        .flat_map(|f| f.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{capitec, Format};

    fn run(text: &str) -> Vec<Aggregated> {
        let format = Format::compile(capitec::profile()).unwrap();
        let lines: Vec<RawLine<'_>> = text
            .lines()
            .enumerate()
            .map(|(i, l)| RawLine::new(i, l))
            .collect();
        aggregate(&lines, &format)
    }

    fn blocks(out: &[Aggregated]) -> Vec<&Block> {
        out.iter()
            .filter_map(|a| match a {
                Aggregated::Block(b) => Some(b),
                Aggregated::Rejected(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_single_line_blocks() {
        let out = run("Transaction History\n\
                       01/10/2024 Purchase at Pick n Pay Groceries 500.00 50.00 4500.00\n\
                       02/10/2024 Payment Received Other Income 100.00 4600.00\n");
        let b = blocks(&out);
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].line, 1);
        assert_eq!(b[0].text, "Purchase at Pick n Pay Groceries 500.00 50.00 4500.00");
        assert_eq!(b[1].date, NaiveDate::from_ymd_opt(2024, 10, 2).unwrap());
    }

    #[test]
    fn test_wrapped_block_joins_continuations() {
        let out = run("19/10/2025 PayShap Payment Received: Main\n   Other Income    25.00   57.77\n");
        let b = blocks(&out);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].text, "PayShap Payment Received: Main Other Income 25.00 57.77");
    }

    #[test]
    fn test_noise_before_amount_is_skipped() {
        let out = run("19/10/2025 Debit Order: Insurer\nPage 1 of 2\nTransaction History\nInsurance 120.00 880.00\n");
        let b = blocks(&out);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].text, "Debit Order: Insurer Insurance 120.00 880.00");
    }

    #[test]
    fn test_noise_after_amount_seals_block() {
        let out = run("19/10/2025 Purchase Groceries 20.00 80.00\nPage 1 of 2\nstray footer text 9.99\n");
        let b = blocks(&out);
        assert_eq!(b[0].text, "Purchase Groceries 20.00 80.00");
    }

    #[test]
    fn test_block_never_crosses_next_anchor() {
        let out = run("01/10/2024 Insufficient funds notice\n02/10/2024 Purchase 10.00 90.00\n");
        assert_eq!(out.len(), 2);
        assert!(matches!(
            &out[0],
            Aggregated::Rejected(Diagnostic { line: 0, kind: DiagnosticKind::NoAmounts, .. })
        ));
        assert_eq!(blocks(&out)[0].line, 1);
    }

    #[test]
    fn test_lookahead_bound() {
        // Amount sits six lines after the anchor; the default window is five.
        let out = run("01/10/2024 Wrapped\na\nb\nc\nd\ne\nGroceries 10.00 90.00\n");
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], Aggregated::Rejected(d) if d.kind == DiagnosticKind::NoAmounts));

        let out = run("01/10/2024 Wrapped\na\nb\nc\nd\nGroceries 10.00 90.00\n");
        assert_eq!(blocks(&out)[0].text, "Wrapped a b c d Groceries 10.00 90.00");
    }

    #[test]
    fn test_blank_run_seals_block_after_amount() {
        let out = run("01/10/2024 Purchase 10.00 90.00\n\n\nlegal text 1.00\n");
        assert_eq!(blocks(&out)[0].text, "Purchase 10.00 90.00");

        // A single blank line between description and amounts is tolerated.
        let out = run("01/10/2024 Purchase\n\nGroceries 10.00 90.00\n");
        assert_eq!(blocks(&out)[0].text, "Purchase Groceries 10.00 90.00");
    }

    #[test]
    fn test_malformed_anchor_is_rejected_and_consumes_continuations() {
        let out = run("31/02/2024 Purchase\nGroceries 10.00 90.00\n01/03/2024 Purchase 5.00 85.00\n");
        assert_eq!(out.len(), 2);
        assert!(matches!(
            &out[0],
            Aggregated::Rejected(Diagnostic { kind: DiagnosticKind::MalformedDate { token }, .. })
                if token == "31/02/2024"
        ));
        assert_eq!(blocks(&out)[0].line, 2);
    }

    #[test]
    fn test_join_fragments_normalizes_spaces() {
        assert_eq!(join_fragments(&["  a   b ", "", "c"]), "a b c");
    }
}
