//! Amount extraction and partitioning.
//!
//! Grammar: optional sign, digits with optional `,` thousands groups, a
//! decimal point and exactly two fractional digits. Tokens are partitioned by
//! count, in order of appearance:
//!
//! | count | reading                                    |
//! |-------|--------------------------------------------|
//! | 3     | amount, fee, balance (per `ThreeAmountRule`) |
//! | 2     | amount or fee, then balance (per `TwoAmountRule`) |
//! | 1     | amount only, no balance                    |
//! | 0     | rejected                                   |
//!
//! More than three: the trailing three are the money columns.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use crate::formats::{Format, ThreeAmountRule, TwoAmountRule};
use crate::types::Direction;

static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<sign>[-+])?(?P<int>\d{1,3}(?:,\d{3})+|\d+)\.(?P<frac>\d{2})\b").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// A currency-shaped token found in a block's working text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken {
    /// Non-negative magnitude.
    pub value: Decimal,
    pub sign: Option<Sign>,
    /// Byte span in the working text, sign included.
    pub start: usize,
    pub end: usize,
}

impl AmountToken {
    /// Signed value as printed.
    pub fn signed(&self) -> Decimal {
        match self.sign {
            Some(Sign::Minus) => -self.value,
            _ => self.value,
        }
    }

    fn hint(&self) -> Option<Direction> {
        match self.sign {
            Some(Sign::Minus) => Some(Direction::Debit),
            Some(Sign::Plus) => Some(Direction::Credit),
            None => None,
        }
    }
}

pub fn contains_amount(text: &str) -> bool {
    !extract(text).is_empty()
}

/// An amount starts the text or follows whitespace, `(`, a currency `R` or
/// a glued hyphen.
fn opens_amount(text: &str, at: usize) -> bool {
    let before = &text[..at];
    match before.chars().next_back() {
        None => true,
        Some('(' | '-' | '+') => true,
        Some('R') => before[..before.len() - 1]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric()),
        Some(c) => c.is_whitespace(),
    }
}

/// An amount ends the text or is followed by whitespace or `)`.
fn closes_amount(text: &str, at: usize) -> bool {
    text[at..]
        .chars()
        .next()
        .is_none_or(|c| c.is_whitespace() || c == ')')
}

/// All amount tokens in `text`, in order of appearance.
///
/// Percentages, dotted dates and numbers glued to words are not amounts.
pub fn extract(text: &str) -> Vec<AmountToken> {
    AMOUNT
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let int = caps.name("int")?;
            let frac = caps.name("frac")?;

            // A sign glued to a word ("Ref-12.50") is a hyphen, not a sign.
            let sign = caps.name("sign").and_then(|m| {
                let glued = text[..m.start()].ends_with(|c: char| c.is_alphanumeric());
                match (glued, m.as_str()) {
                    (true, _) => None,
                    (false, "-") => Some(Sign::Minus),
                    (false, _) => Some(Sign::Plus),
                }
            });
            let start = if sign.is_some() { whole.start() } else { int.start() };
            if !opens_amount(text, start) || !closes_amount(text, whole.end()) {
                return None;
            }

            let value: Decimal = format!("{}.{}", int.as_str().replace(',', ""), frac.as_str())
                .parse()
                .ok()?;

            Some(AmountToken {
                value,
                sign,
                start,
                end: whole.end(),
            })
        })
        .collect()
}

/// Money columns of one block. Magnitudes only; `hint` carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub amount: Decimal,
    pub fee: Decimal,
    pub balance: Option<Decimal>,
    /// Direction implied by an explicit sign on the amount, if any.
    pub hint: Option<Direction>,
}

/// Assign tokens to amount/fee/balance.
///
/// `fee_context` is true when the block reads as a fee-only notification; it
/// only matters for [`TwoAmountRule::FeeKeyword`]. Returns `None` for an empty
/// token list.
pub fn partition(tokens: &[AmountToken], format: &Format, fee_context: bool) -> Option<Partition> {
    let profile = format.profile();
    let tokens = if tokens.len() > 3 {
        warn!(
            count = tokens.len(),
            "more than three amounts in one block; using the trailing three"
        );
        &tokens[tokens.len() - 3..]
    } else {
        tokens
    };

    let p = match tokens {
        [] => return None,
        [amount] => Partition {
            amount: amount.value,
            fee: Decimal::ZERO,
            balance: None,
            hint: amount.hint(),
        },
        [first, balance] => {
            let fee_first = match profile.two_amount_rule {
                TwoAmountRule::FeeKeyword => fee_context,
                TwoAmountRule::AmountFirst => false,
                TwoAmountRule::FeeFirst => true,
            };
            if fee_first {
                Partition {
                    amount: Decimal::ZERO,
                    fee: first.value,
                    balance: Some(balance.value),
                    hint: None,
                }
            } else {
                Partition {
                    amount: first.value,
                    fee: Decimal::ZERO,
                    balance: Some(balance.value),
                    hint: first.hint(),
                }
            }
        }
        [a, b, balance, ..] => {
            let (amount, fee) = match profile.three_amount_rule {
                ThreeAmountRule::AmountFeeBalance => (a, b),
                ThreeAmountRule::FeeAmountBalance => (b, a),
            };
            Partition {
                amount: amount.value,
                fee: fee.value,
                balance: Some(balance.value),
                hint: amount.hint(),
            }
        }
    };

    Some(p)
}

/// Split the working text around its amounts.
///
/// Returns the text before the first amount, and the text after it with every
/// other amount removed. With no tokens the whole text is the head. Bare `-`
/// column placeholders are dropped from both.
pub fn surrounding_text(text: &str, tokens: &[AmountToken]) -> (String, String) {
    let Some(first) = tokens.first() else {
        return (tidy(text), String::new());
    };

    let mut tail = String::new();
    let mut cursor = first.end;
    for t in &tokens[1..] {
        tail.push_str(&text[cursor..t.start]);
        tail.push(' ');
        cursor = t.end;
    }
    tail.push_str(&text[cursor..]);

    (tidy(&text[..first.start]), tidy(&tail))
}

fn tidy(text: &str) -> String {
    text.split_whitespace()
        .filter(|w| *w != "-")
        .collect::<Vec<_>>()
        .join(" ")
}
