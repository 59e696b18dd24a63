//! TymeBank account statement.
//!
//! Expected extracted-text rows (fees, money out, money in, balance; empty
//! columns print as `-`):
//!   2 Oct 2024  Card Purchase Checkers Sandton
//!               -        150.00     -         850.00
//!   3 Oct 2024  Monthly Fee          5.00 - -  845.00
//!
//! Long numeric lines on their own are card/reference numbers, not amounts.

use super::{DatePattern, FormatProfile, ThreeAmountRule, TwoAmountRule};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn profile() -> FormatProfile {
    FormatProfile {
        id: "tymebank".to_string(),
        reference_prefix: "TYME".to_string(),
        date_patterns: vec![DatePattern::new(
            r"\d{1,2}\s+[A-Za-z]{3}\s+\d{4}",
            "%d %b %Y",
        )],
        noise_patterns: strings(&[
            r"^\s*\d{10,}\s*$",
            r"^\s*date\s+description",
            r"fees\s+money\s+out\s+money\s+in",
            r"\bpage\s+\d+\s+of\s+\d+",
            r"^\s*(opening|closing) balance",
            r"balance brought forward",
            r"tymebank is an authorised",
        ]),
        categories: Vec::new(),
        income_categories: Vec::new(),
        credit_keywords: strings(&[
            "deposit",
            "received",
            "transfer from",
            "salary",
            "interest",
            "refund",
            "reversal",
            "cashback",
        ]),
        debit_keywords: strings(&[
            "purchase",
            "withdrawal",
            "payment to",
            "transfer to",
            "debit order",
            "send money",
            "fee",
            "charge",
        ]),
        fee_keywords: strings(&["fee", "fees", "charge"]),
        fee_label: "Fees".to_string(),
        fee_suffix: " (Fee)".to_string(),
        two_amount_rule: TwoAmountRule::FeeKeyword,
        three_amount_rule: ThreeAmountRule::FeeAmountBalance,
        lookahead: super::DEFAULT_LOOKAHEAD,
        blank_run_limit: super::DEFAULT_BLANK_RUN_LIMIT,
    }
}
