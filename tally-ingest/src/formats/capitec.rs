//! Capitec Bank account statement.
//!
//! Expected extracted-text section:
//!   Transaction History
//!   Date        Description                     Category        Money In  Money Out  Fee*   Balance
//!   01/10/2024  Purchase at Pick n Pay          Groceries                  500.00    50.00  4500.00
//!   19/10/2025  PayShap Payment Received: Main
//!               Other Income                                     25.00                       57.77
//!
//! Rows never print a sign; direction comes from the lexicon. Long
//! descriptions wrap, pushing the category and money columns onto the
//! following line.

use super::{DatePattern, FormatProfile, ThreeAmountRule, TwoAmountRule};

const CATEGORIES: &[&str] = &[
    "Other Income",
    "Investment Income",
    "Transfer",
    "Transfers",
    "Cash Withdrawal",
    "Digital Payments",
    "Cellphone",
    "Groceries",
    "Takeaways",
    "Online Store",
    "Furniture & Appliances",
    "Uncategorised",
    "Investments",
    "Savings",
    "Fees",
    "Interest",
    "Alcohol",
    "Other Personal & Family",
    "Entertainment",
    "Clothing & Footwear",
    "Transport",
    "Medical",
    "Insurance",
    "Education",
    "Home & Garden",
    "Pets",
    "Subscriptions",
];

const INCOME_CATEGORIES: &[&str] = &["Other Income", "Investment Income", "Interest"];

const CREDIT_KEYWORDS: &[&str] = &[
    "payshap payment received",
    "payment received",
    "transfer received",
    "received:",
    "received",
    "deposit",
    "interest",
    "refund",
    "reversal",
    "dispute",
    "set-off",
    "cashback",
    "sweep",
];

const DEBIT_KEYWORDS: &[&str] = &[
    "purchase",
    "prepaid purchase",
    "payment:",
    "cash sent",
    "cash withdrawal",
    "withdrawal",
    "voucher",
    "debit order",
    "transfer to",
    "external payment",
    "immediate payment",
    "card replacement",
    "admin fee",
    "capitec pay",
    "round-up",
    "swipe",
    "fee",
    "charge",
];

const FEE_KEYWORDS: &[&str] = &["fee", "fees"];

const NOISE: &[&str] = &[
    r"transaction history",
    r"^\s*date\s+description",
    r"^\s*money\s+(in|out)\b",
    r"\*\s*includes vat",
    r"spending summary",
    r"fee summary",
    r"\bpage\s+\d+\s+of\s+\d+",
    r"continued on (the )?next page",
    r"^\s*(opening|closing|available) balance",
    r"capitec bank limited",
    r"registered credit provider",
    r"authorised financial services",
    r"unique document no",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn profile() -> FormatProfile {
    FormatProfile {
        id: "capitec".to_string(),
        reference_prefix: "CAP".to_string(),
        date_patterns: vec![
            DatePattern::new(r"\d{1,2}/\d{1,2}/\d{4}", "%d/%m/%Y"),
            DatePattern::new(r"\d{1,2}/\d{1,2}/\d{2}", "%d/%m/%y"),
        ],
        noise_patterns: strings(NOISE),
        categories: strings(CATEGORIES),
        income_categories: strings(INCOME_CATEGORIES),
        credit_keywords: strings(CREDIT_KEYWORDS),
        debit_keywords: strings(DEBIT_KEYWORDS),
        fee_keywords: strings(FEE_KEYWORDS),
        fee_label: "Fees".to_string(),
        fee_suffix: " (Fee)".to_string(),
        two_amount_rule: TwoAmountRule::FeeKeyword,
        three_amount_rule: ThreeAmountRule::AmountFeeBalance,
        lookahead: super::DEFAULT_LOOKAHEAD,
        blank_run_limit: super::DEFAULT_BLANK_RUN_LIMIT,
    }
}
