//! Credit/debit classification.
//!
//! Priority: explicit sign on the amount, then description keywords (credit
//! list before debit list), then the category (income classes are credits).
//! With no signal at all the transaction is a debit.

use crate::formats::Format;
use crate::types::Direction;

pub fn classify_direction(
    description: &str,
    category: Option<&str>,
    hint: Option<Direction>,
    format: &Format,
) -> Direction {
    if let Some(direction) = hint {
        return direction;
    }

    if format.credit_keywords().matches(description) {
        return Direction::Credit;
    }
    if format.debit_keywords().matches(description) {
        return Direction::Debit;
    }

    if category.is_some_and(|c| format.is_income_category(c)) {
        Direction::Credit
    } else {
        Direction::Debit
    }
}

/// True when the block reads as a fee-only notification.
///
/// A fee reversal or refund names a fee but returns money, so a credit
/// keyword in the description rules the fee reading out.
pub fn is_fee_context(description: &str, category: Option<&str>, format: &Format) -> bool {
    let fees = format.fee_keywords();
    let mentions_fee = fees.matches(description) || category.is_some_and(|c| fees.matches(c));
    mentions_fee && !format.credit_keywords().matches(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{capitec, Format};
    use rstest::rstest;

    #[rstest]
    #[case("PayShap Payment Received: Main", None, Direction::Credit)]
    #[case("Interest Received", None, Direction::Credit)]
    #[case("Refund Takealot", Some("Online Store"), Direction::Credit)]
    #[case("Purchase at Pick n Pay", Some("Groceries"), Direction::Debit)]
    #[case("Cash Withdrawal ATM Sandton", None, Direction::Debit)]
    #[case("Monthly Account Admin Fee", Some("Fees"), Direction::Debit)]
    #[case("Boxer Superstores", Some("Other Income"), Direction::Credit)]
    #[case("Boxer Superstores", Some("Groceries"), Direction::Debit)]
    #[case("Unknown movement", None, Direction::Debit)]
    fn test_classify_direction(
        #[case] description: &str,
        #[case] category: Option<&str>,
        #[case] expected: Direction,
    ) {
        let format = Format::compile(capitec::profile()).unwrap();
        assert_eq!(classify_direction(description, category, None, &format), expected);
    }

    #[test]
    fn test_explicit_sign_wins() {
        let format = Format::compile(capitec::profile()).unwrap();
        let d = classify_direction(
            "Payment Received",
            Some("Other Income"),
            Some(Direction::Debit),
            &format,
        );
        assert_eq!(d, Direction::Debit);
    }

    #[test]
    fn test_fee_context() {
        let format = Format::compile(capitec::profile()).unwrap();
        assert!(is_fee_context("Monthly Account Admin Fee", None, &format));
        assert!(is_fee_context("SMS Notification", Some("Fees"), &format));
        assert!(!is_fee_context("Coffee Shop", Some("Takeaways"), &format));
    }

    #[rstest]
    #[case("Admin Fee Reversal")]
    #[case("Refund: Card Replacement Fee")]
    fn test_fee_credit_is_not_fee_context(#[case] description: &str) {
        let format = Format::compile(capitec::profile()).unwrap();
        assert!(!is_fee_context(description, Some("Fees"), &format));
        assert_eq!(
            classify_direction(description, Some("Fees"), None, &format),
            Direction::Credit
        );
    }
}
