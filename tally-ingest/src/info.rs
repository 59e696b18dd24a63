//! Statement header facts: account number, period, opening/closing balance.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::formats::Format;
use crate::types::{RawLine, StatementInfo, StatementPeriod};

static ACCOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)account\s*(?:number|no\.?)\s*[:#]?\s*(\d[\d ]{4,}\d)").unwrap());
static PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)statement\s+period\s*:?\s*(.+?)\s+(?:-|to)\s+(.+?)\s*$").unwrap()
});
static OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)opening\s+balance\s*:?\s*R?\s*(-?\d{1,3}(?:,\d{3})*\.\d{2}|-?\d+\.\d{2})").unwrap()
});
static CLOSING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)closing\s+balance\s*:?\s*R?\s*(-?\d{1,3}(?:,\d{3})*\.\d{2}|-?\d+\.\d{2})").unwrap()
});

fn money(re: &Regex, line: &str) -> Option<Decimal> {
    let caps = re.captures(line)?;
    caps.get(1)?.as_str().replace(',', "").parse().ok()
}

/// Scan every line; the first hit for each field wins.
pub fn extract(lines: &[RawLine<'_>], format: &Format) -> StatementInfo {
    let mut info = StatementInfo::default();

    for line in lines {
        let text = line.text;

        if info.account_number.is_none() {
            info.account_number = ACCOUNT
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().replace(' ', ""));
        }
        if info.period.is_none() {
            info.period = PERIOD.captures(text).and_then(|c| {
                let start = format.parse_date(c.get(1)?.as_str())?;
                let end = format.parse_date(c.get(2)?.as_str())?;
                Some(StatementPeriod { start, end })
            });
        }
        if info.opening_balance.is_none() {
            info.opening_balance = money(&OPENING, text);
        }
        if info.closing_balance.is_none() {
            info.closing_balance = money(&CLOSING, text);
        }
    }

    info
}
