use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_ingest::{
    DiagnosticKind, Direction, FormatProfile, FormatRegistry, ParseError, StatementParser, parse,
};

const CAPITEC_OCTOBER: &str = r#"
Capitec Bank Limited
Account Number: 1234567890
Statement Period: 01/10/2025 - 31/10/2025
Opening Balance: R77.27
Transaction History
Date Description Category Money In Money Out Fee* Balance
17/10/2025 Monthly Account Admin Fee Fees 7.50 69.77
18/10/2025 Prepaid Purchase: Vodacom Cellphone 10.00 59.77
19/10/2025 Purchase at Spar Groceries 21.00 46.27
19/10/2025 Insufficient Funds Notification
Page 1 of 2
Capitec Bank Limited
Transaction History
Date Description Category Money In Money Out Fee* Balance
19/10/2025 PayShap Payment Received: Main
Other Income 25.00 84.77
19/10/2025 Cash Withdrawal ATM Sandton City Cash Withdrawal 15.00 2.50 67.27
20/10/2025 Interest Received Interest 0.12 46.39
Page 2 of 2
Closing Balance: R46.39
"#;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn test_parse_capitec_statement() {
    let stmt = parse(&lines(CAPITEC_OCTOBER), "capitec").unwrap();

    let got: Vec<(&str, Direction, Decimal, Option<Decimal>)> = stmt
        .iter()
        .map(|t| (t.description.as_str(), t.direction, t.amount, t.balance))
        .collect();

    assert_eq!(
        got,
        vec![
            ("Interest Received", Direction::Credit, dec("0.12"), Some(dec("46.39"))),
            ("PayShap Payment Received: Main", Direction::Credit, dec("25.00"), Some(dec("84.77"))),
            ("Cash Withdrawal ATM Sandton City", Direction::Debit, dec("15.00"), Some(dec("67.27"))),
            ("Cash Withdrawal ATM Sandton City (Fee)", Direction::Debit, dec("2.50"), Some(dec("67.27"))),
            ("Purchase at Spar", Direction::Debit, dec("21.00"), Some(dec("46.27"))),
            ("Prepaid Purchase: Vodacom", Direction::Debit, dec("10.00"), Some(dec("59.77"))),
            ("Monthly Account Admin Fee", Direction::Debit, dec("7.50"), Some(dec("69.77"))),
        ]
    );

    let categories: Vec<Option<&str>> = stmt.iter().map(|t| t.category.as_deref()).collect();
    assert_eq!(
        categories,
        vec![
            Some("Interest"),
            Some("Other Income"),
            Some("Cash Withdrawal"),
            Some("Fees"),
            Some("Groceries"),
            Some("Cellphone"),
            Some("Fees"),
        ]
    );
}

#[test]
fn test_skipped_block_is_reported_not_fatal() {
    let stmt = parse(&lines(CAPITEC_OCTOBER), "capitec").unwrap();
    assert_eq!(stmt.diagnostics().len(), 1);

    let diag = &stmt.diagnostics()[0];
    assert_eq!(diag.kind, DiagnosticKind::NoAmounts);
    assert_eq!(diag.excerpt, "Insufficient Funds Notification");
    assert_eq!(lines(CAPITEC_OCTOBER)[diag.line], "19/10/2025 Insufficient Funds Notification");
}

#[test]
fn test_statement_header_info() {
    let stmt = parse(&lines(CAPITEC_OCTOBER), "capitec").unwrap();
    let info = stmt.info();
    assert_eq!(info.account_number.as_deref(), Some("1234567890"));
    assert_eq!(info.opening_balance, Some(dec("77.27")));
    assert_eq!(info.closing_balance, Some(dec("46.39")));
    assert_eq!(
        info.period.map(|p| (p.start, p.end)),
        Some((
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
        ))
    );
    assert_eq!(stmt.format(), "capitec");
}

#[test]
fn test_references_are_stable_across_parses() {
    let a = parse(&lines(CAPITEC_OCTOBER), "capitec").unwrap();
    let b = parse(&lines(CAPITEC_OCTOBER), "capitec").unwrap();
    assert_eq!(a, b);

    let refs: Vec<&str> = a.iter().map(|t| t.reference.as_str()).collect();
    let mut unique = refs.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), refs.len());

    // Spar was the first 19/10 row seen, the PayShap credit the second.
    assert!(a.transactions()[4].reference.starts_with("CAP-20251019-0000-"));
    assert!(a.transactions()[1].reference.starts_with("CAP-20251019-0001-"));
}

#[test]
fn test_identical_rows_are_not_deduplicated() {
    let stmt = parse(
        &[
            "03/10/2025 Purchase at Spar Groceries 21.00 100.00",
            "03/10/2025 Purchase at Spar Groceries 21.00 100.00",
        ],
        "capitec",
    )
    .unwrap();
    assert_eq!(stmt.len(), 2);
    assert_ne!(stmt.transactions()[0].reference, stmt.transactions()[1].reference);
}

#[test]
fn test_every_record_has_positive_amount_and_no_fee() {
    let stmt = parse(&lines(CAPITEC_OCTOBER), "capitec").unwrap();
    for t in &stmt {
        assert!(t.amount > Decimal::ZERO, "{t:?}");
        assert_eq!(t.fee, Decimal::ZERO, "{t:?}");
    }
}

#[test]
fn test_parse_tymebank_statement() {
    let text = "\
TymeBank
Statement period 1 Oct 2024 to 31 Oct 2024
Date Description Fees Money Out Money In Balance
2 Oct 2024 Card Purchase Checkers Sandton
4000123412341234
- 150.00 - 850.00
3 Oct 2024 Monthly Fee
5.00 - - 845.00
3 Oct 2024 Salary Deposit ACME
- - 1,000.00 1,845.00
5 Oct 2024 Cash Withdrawal ATM
2.00 100.00 - 1,743.00
";
    let stmt = parse(&lines(text), "tymebank").unwrap();
    let got: Vec<(&str, Direction, Decimal)> = stmt
        .iter()
        .map(|t| (t.description.as_str(), t.direction, t.amount))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Cash Withdrawal ATM", Direction::Debit, dec("100.00")),
            ("Cash Withdrawal ATM (Fee)", Direction::Debit, dec("2.00")),
            ("Salary Deposit ACME", Direction::Credit, dec("1000.00")),
            ("Monthly Fee", Direction::Debit, dec("5.00")),
            ("Card Purchase Checkers Sandton", Direction::Debit, dec("150.00")),
        ]
    );
    assert!(stmt.transactions()[0].reference.starts_with("TYME-20241005-0000-"));
    assert_eq!(stmt.transactions()[3].category.as_deref(), Some("Fees"));
}

#[test]
fn test_unsupported_format_returns_no_partial_output() {
    let err = parse(&lines(CAPITEC_OCTOBER), "standard-bank").unwrap_err();
    assert_eq!(err, ParseError::FormatUnsupported("standard-bank".to_string()));
}

#[test]
fn test_non_statement_input() {
    let err = parse(&["Dear customer,", "Your statement is attached."], "capitec").unwrap_err();
    assert!(matches!(err, ParseError::NoTransactionsFound { .. }));
}

#[test]
fn test_custom_profile_from_toml() {
    let profile: FormatProfile = toml::from_str(
        r#"
id = "iso-bank"
reference_prefix = "ISO"
noise_patterns = ["^statement"]
categories = ["Rent", "Salary"]
income_categories = ["Salary"]
debit_keywords = ["debit"]
two_amount_rule = "amount-first"

[[date_patterns]]
pattern = '\d{4}-\d{2}-\d{2}'
format = "%Y-%m-%d"
"#,
    )
    .unwrap();

    let mut registry = FormatRegistry::empty();
    registry.register(profile).unwrap();
    let parser = StatementParser::new(registry);

    let stmt = parser
        .parse(
            &[
                "Statement for March",
                "2024-03-01 ACME Payroll Salary 1,000.00 1,200.00",
                "2024-03-02 Landlord Rent 800.00 400.00",
            ],
            "iso-bank",
        )
        .unwrap();

    assert_eq!(stmt.len(), 2);
    assert_eq!(stmt.transactions()[0].description, "Landlord");
    assert_eq!(stmt.transactions()[0].direction, Direction::Debit);
    assert_eq!(stmt.transactions()[1].direction, Direction::Credit);
    assert!(stmt.transactions()[1].reference.starts_with("ISO-20240301-"));
}

#[test]
fn test_parse_bank_csv_export() {
    let export = "\
Transaction Date,Posting Date,Description,Debits,Credits,Balance,Bank account
2025/09/22,2025/09/22,Opening deposit,,\"R1,000.00\",\"R1,000.00\",1234567890
2025/09/23,2025/09/24,Purchase at Spar Groceries,-21.00,,R979.00,1234567890
2025/09/23,2025/09/24,Monthly Admin Fee,-7.50,,R971.50,1234567890
";
    let stmt = tally_ingest::parse_csv(export.as_bytes(), "capitec").unwrap();
    assert_eq!(stmt.info().account_number.as_deref(), Some("1234567890"));

    let got: Vec<(&str, Direction, Decimal)> = stmt
        .iter()
        .map(|t| (t.description.as_str(), t.direction, t.amount))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Purchase at Spar Groceries", Direction::Debit, dec("21.00")),
            ("Monthly Admin Fee", Direction::Debit, dec("7.50")),
            ("Opening deposit", Direction::Credit, dec("1000.00")),
        ]
    );
    for t in &stmt {
        assert!(t.reference.starts_with("CAP-2025092"));
        assert_eq!(t.fee, Decimal::ZERO);
    }

    let again = tally_ingest::parse_csv(export.as_bytes(), "capitec").unwrap();
    assert_eq!(stmt, again);
}
