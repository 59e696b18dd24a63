//! Statement format profiles.
//!
//! A [`FormatProfile`] is plain data (it deserializes from TOML) describing
//! one bank's statement layout: how anchor dates look, which lines are page
//! furniture, the category vocabulary and the credit/debit lexicon. It is
//! compiled once into a [`Format`] and looked up by id in a
//! [`FormatRegistry`]. Nothing here is shared mutable state; two parses of
//! different formats never see each other's tables.

pub mod capitec;
pub mod tymebank;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::{Regex, RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const DEFAULT_LOOKAHEAD: usize = 5;
pub const DEFAULT_BLANK_RUN_LIMIT: usize = 2;

/// A date token grammar: a regex matched at the start of a line plus the
/// chrono format string used to turn the token into a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePattern {
    pub pattern: String,
    pub format: String,
}

impl DatePattern {
    pub fn new(pattern: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            format: format.into(),
        }
    }
}

/// How to read a block with exactly two amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TwoAmountRule {
    /// (fee, balance) when a fee keyword matches the description or category,
    /// (amount, balance) otherwise.
    #[default]
    FeeKeyword,
    /// Always (amount, balance).
    AmountFirst,
    /// Always (fee, balance).
    FeeFirst,
}

/// Column order of a block with three amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreeAmountRule {
    #[default]
    AmountFeeBalance,
    FeeAmountBalance,
}

fn default_fee_label() -> String {
    "Fees".to_string()
}

fn default_fee_suffix() -> String {
    " (Fee)".to_string()
}

fn default_lookahead() -> usize {
    DEFAULT_LOOKAHEAD
}

fn default_blank_run_limit() -> usize {
    DEFAULT_BLANK_RUN_LIMIT
}

/// Per-format configuration. See the module docs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatProfile {
    pub id: String,
    /// Leading segment of every generated reference, e.g. `CAP`.
    pub reference_prefix: String,
    pub date_patterns: Vec<DatePattern>,
    /// Case-insensitive regexes for headers, footers and boilerplate.
    #[serde(default)]
    pub noise_patterns: Vec<String>,
    /// Category labels exactly as the bank prints them.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Categories that imply money received.
    #[serde(default)]
    pub income_categories: Vec<String>,
    #[serde(default)]
    pub credit_keywords: Vec<String>,
    #[serde(default)]
    pub debit_keywords: Vec<String>,
    /// Keywords marking a fee-only notification row.
    #[serde(default)]
    pub fee_keywords: Vec<String>,
    #[serde(default = "default_fee_label")]
    pub fee_label: String,
    #[serde(default = "default_fee_suffix")]
    pub fee_suffix: String,
    #[serde(default)]
    pub two_amount_rule: TwoAmountRule,
    #[serde(default)]
    pub three_amount_rule: ThreeAmountRule,
    /// Continuation lines pulled after an anchor before the block is sealed.
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
    /// Consecutive blank lines that seal a block once it has an amount.
    #[serde(default = "default_blank_run_limit")]
    pub blank_run_limit: usize,
}

/// A date anchor found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch<'a> {
    /// The date token as written.
    pub token: &'a str,
    /// `None` when the token has the right shape but is not a real date.
    pub date: Option<NaiveDate>,
    /// Text following the token, trimmed.
    pub rest: &'a str,
}

#[derive(Debug, Clone)]
struct CompiledDate {
    regex: Regex,
    format: String,
}

/// A compiled, immutable [`FormatProfile`].
#[derive(Debug, Clone)]
pub struct Format {
    profile: FormatProfile,
    dates: Vec<CompiledDate>,
    noise: RegexSet,
    categories: Lexicon,
    credit: Lexicon,
    debit: Lexicon,
    fee: Lexicon,
    income: Vec<String>,
}

impl Format {
    pub fn compile(profile: FormatProfile) -> Result<Self, ParseError> {
        let invalid = |reason: String| ParseError::InvalidFormat {
            id: profile.id.clone(),
            reason,
        };

        if profile.id.trim().is_empty() {
            return Err(invalid("id is empty".to_string()));
        }
        if profile.date_patterns.is_empty() {
            return Err(invalid("at least one date pattern is required".to_string()));
        }
        if profile.lookahead == 0 {
            return Err(invalid("lookahead must be at least 1".to_string()));
        }

        let mut dates = Vec::with_capacity(profile.date_patterns.len());
        for dp in &profile.date_patterns {
            let regex = Regex::new(&format!(r"^\s*(?:{})", dp.pattern))
                .map_err(|e| invalid(format!("date pattern {:?}: {e}", dp.pattern)))?;
            dates.push(CompiledDate {
                regex,
                format: dp.format.clone(),
            });
        }

        let noise = RegexSetBuilder::new(&profile.noise_patterns)
            .case_insensitive(true)
            .build()
            .map_err(|e| invalid(format!("noise pattern: {e}")))?;

        let lexicon = |what: &str, v: &[String]| {
            Lexicon::compile(v).map_err(|e| invalid(format!("{what}: {e}")))
        };

        Ok(Self {
            categories: lexicon("category", &profile.categories)?,
            credit: lexicon("credit keyword", &profile.credit_keywords)?,
            debit: lexicon("debit keyword", &profile.debit_keywords)?,
            fee: lexicon("fee keyword", &profile.fee_keywords)?,
            income: profile
                .income_categories
                .iter()
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            dates,
            noise,
            profile,
        })
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn profile(&self) -> &FormatProfile {
        &self.profile
    }

    pub fn lookahead(&self) -> usize {
        self.profile.lookahead
    }

    /// Same format with a different lookahead window. Zero is clamped to one.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.profile.lookahead = lookahead.max(1);
        self
    }

    /// Match a date token at the start of `line`.
    ///
    /// The token must be followed by whitespace or the end of the line. When
    /// several patterns have the right shape the first one that yields a real
    /// date wins; if none does, the first shaped token is reported with
    /// `date: None`.
    pub fn match_date<'a>(&self, line: &'a str) -> Option<DateMatch<'a>> {
        let mut malformed = None;

        for cd in &self.dates {
            let Some(m) = cd.regex.find(line) else {
                continue;
            };
            let tail = &line[m.end()..];
            if !(tail.is_empty() || tail.starts_with(char::is_whitespace)) {
                continue;
            }

            let token = m.as_str().trim();
            let rest = tail.trim();
            match NaiveDate::parse_from_str(token, &cd.format) {
                Ok(date) => {
                    return Some(DateMatch {
                        token,
                        date: Some(date),
                        rest,
                    });
                }
                Err(_) => {
                    malformed.get_or_insert(DateMatch {
                        token,
                        date: None,
                        rest,
                    });
                }
            }
        }

        malformed
    }

    /// Parse a free-standing date token with any of the format's grammars.
    pub fn parse_date(&self, token: &str) -> Option<NaiveDate> {
        let token = token.trim();
        self.dates
            .iter()
            .find_map(|cd| NaiveDate::parse_from_str(token, &cd.format).ok())
    }

    pub fn is_noise(&self, line: &str) -> bool {
        self.noise.is_match(line)
    }

    pub(crate) fn categories(&self) -> &Lexicon {
        &self.categories
    }

    pub(crate) fn credit_keywords(&self) -> &Lexicon {
        &self.credit
    }

    pub(crate) fn debit_keywords(&self) -> &Lexicon {
        &self.debit
    }

    pub(crate) fn fee_keywords(&self) -> &Lexicon {
        &self.fee
    }

    pub(crate) fn is_income_category(&self, category: &str) -> bool {
        let category = category.trim();
        self.income.iter().any(|i| i.eq_ignore_ascii_case(category))
    }
}

/// Compiled formats keyed by lowercase id.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: BTreeMap<String, Format>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding every built-in format.
    pub fn builtin() -> Result<Self, ParseError> {
        let mut registry = Self::empty();
        registry.register(capitec::profile())?;
        registry.register(tymebank::profile())?;
        Ok(registry)
    }

    /// Compile and add a profile, replacing any format with the same id.
    pub fn register(&mut self, profile: FormatProfile) -> Result<(), ParseError> {
        let format = Format::compile(profile)?;
        self.insert(format);
        Ok(())
    }

    pub fn insert(&mut self, format: Format) {
        self.formats.insert(format.id().to_ascii_lowercase(), format);
    }

    pub fn get(&self, id: &str) -> Result<&Format, ParseError> {
        self.formats
            .get(&id.trim().to_ascii_lowercase())
            .ok_or_else(|| ParseError::FormatUnsupported(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.formats.values().map(Format::id)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Phrases compiled to case-insensitive regexes, kept in profile order.
///
/// A word boundary is only required on a side where the phrase starts (or
/// ends) with an alphanumeric character, so `"received:"` still matches
/// `"Received: Main"`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Lexicon {
    phrases: Vec<(String, Regex)>,
}

impl Lexicon {
    fn compile(phrases: &[String]) -> Result<Self, regex::Error> {
        let mut compiled = Vec::with_capacity(phrases.len());
        for phrase in phrases.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            let left = if phrase.starts_with(char::is_alphanumeric) { r"\b" } else { "" };
            let right = if phrase.ends_with(char::is_alphanumeric) { r"\b" } else { "" };
            let regex = Regex::new(&format!("(?i){left}{}{right}", regex::escape(phrase)))?;
            compiled.push((phrase.to_string(), regex));
        }
        Ok(Self { phrases: compiled })
    }

    pub(crate) fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|(_, re)| re.is_match(text))
    }

    /// First phrase, in profile order, found in any of `texts`.
    pub(crate) fn first_in(&self, texts: &[&str]) -> Option<&str> {
        self.phrases
            .iter()
            .find(|(_, re)| texts.iter().any(|t| re.is_match(t)))
            .map(|(phrase, _)| phrase.as_str())
    }
}
