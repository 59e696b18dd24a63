//! Fee splitting.
//!
//! A block with a nonzero fee yields the main transaction (fee zeroed) and a
//! synthetic fee transaction right after it: same date and balance, amount =
//! fee, always a debit, category forced to the format's fee label and the
//! description suffixed. A block whose only money is a fee yields the fee
//! transaction alone, without the suffix since there is no parent to tell it
//! apart from.

use rust_decimal::Decimal;

use crate::formats::Format;
use crate::types::{Direction, Draft};

/// Split `draft` into the records it emits, parent first.
pub fn split(draft: Draft, format: &Format) -> Vec<Draft> {
    if draft.fee <= Decimal::ZERO {
        return if draft.amount > Decimal::ZERO {
            vec![Draft {
                fee: Decimal::ZERO,
                ..draft
            }]
        } else {
            Vec::new()
        };
    }

    let profile = format.profile();
    let has_parent = draft.amount > Decimal::ZERO;

    let fee = Draft {
        line: draft.line,
        date: draft.date,
        description: if has_parent {
            format!("{}{}", draft.description, profile.fee_suffix)
        } else {
            draft.description.clone()
        },
        amount: draft.fee,
        direction: Direction::Debit,
        category: Some(profile.fee_label.clone()),
        fee: Decimal::ZERO,
        balance: draft.balance,
    };

    if has_parent {
        vec![
            Draft {
                fee: Decimal::ZERO,
                ..draft
            },
            fee,
        ]
    } else {
        vec![fee]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{capitec, Format};
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn draft(amount: &str, fee: &str) -> Draft {
        Draft {
            line: 4,
            date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            description: "Purchase at Pick n Pay".to_string(),
            amount: dec(amount),
            direction: Direction::Debit,
            category: Some("Groceries".to_string()),
            fee: dec(fee),
            balance: Some(dec("4500.00")),
        }
    }

    #[test]
    fn test_split_emits_parent_then_fee() {
        let format = Format::compile(capitec::profile()).unwrap();
        let out = split(draft("500.00", "50.00"), &format);
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].amount, dec("500.00"));
        assert_eq!(out[0].fee, Decimal::ZERO);
        assert_eq!(out[0].category.as_deref(), Some("Groceries"));

        assert_eq!(out[1].amount, dec("50.00"));
        assert_eq!(out[1].fee, Decimal::ZERO);
        assert_eq!(out[1].direction, Direction::Debit);
        assert_eq!(out[1].category.as_deref(), Some("Fees"));
        assert_eq!(out[1].description, "Purchase at Pick n Pay (Fee)");
        assert_eq!(out[1].date, out[0].date);
        assert_eq!(out[1].balance, out[0].balance);
    }

    #[test]
    fn test_fee_is_forced_debit_even_for_credit_parent() {
        let format = Format::compile(capitec::profile()).unwrap();
        let mut d = draft("100.00", "2.00");
        d.direction = Direction::Credit;
        let out = split(d, &format);
        assert_eq!(out[0].direction, Direction::Credit);
        assert_eq!(out[1].direction, Direction::Debit);
    }

    #[test]
    fn test_no_fee_passes_through() {
        let format = Format::compile(capitec::profile()).unwrap();
        let out = split(draft("500.00", "0.00"), &format);
        assert_eq!(out, vec![draft("500.00", "0.00")]);
    }

    #[test]
    fn test_fee_only_block() {
        let format = Format::compile(capitec::profile()).unwrap();
        let out = split(draft("0.00", "7.50"), &format);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, dec("7.50"));
        assert_eq!(out[0].description, "Purchase at Pick n Pay");
        assert_eq!(out[0].category.as_deref(), Some("Fees"));
    }

    #[test]
    fn test_nothing_to_emit() {
        let format = Format::compile(capitec::profile()).unwrap();
        assert!(split(draft("0.00", "0.00"), &format).is_empty());
    }
}
