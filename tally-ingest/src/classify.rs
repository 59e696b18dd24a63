//! Line classification: anchor, continuation, noise or blank.

use chrono::NaiveDate;

use crate::formats::Format;
use crate::types::RawLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Starts with a recognized date; `rest` is the text after the token.
    Anchor { date: NaiveDate, rest: &'a str },
    /// Starts with a date-shaped token that is not a real date.
    MalformedAnchor { token: &'a str, rest: &'a str },
    /// Page header, footer, column titles or boilerplate.
    Noise,
    Blank,
    /// Anything else. The aggregator decides whether it matters.
    Continuation,
}

impl LineClass<'_> {
    pub fn is_anchor(&self) -> bool {
        matches!(self, LineClass::Anchor { .. } | LineClass::MalformedAnchor { .. })
    }
}

/// Classify one line. Total: every line gets a class.
pub fn classify<'a>(line: RawLine<'a>, format: &Format) -> LineClass<'a> {
    let text = line.text.trim();
    if text.is_empty() {
        return LineClass::Blank;
    }
    if format.is_noise(text) {
        return LineClass::Noise;
    }
    match format.match_date(text) {
        Some(m) => match m.date {
            Some(date) => LineClass::Anchor { date, rest: m.rest },
            None => LineClass::MalformedAnchor {
                token: m.token,
                rest: m.rest,
            },
        },
        None => LineClass::Continuation,
    }
}
