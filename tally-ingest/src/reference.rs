//! Deterministic transaction references.
//!
//! `{prefix}-{yyyymmdd}-{position:04}-{hash}` where position counts earlier
//! transactions on the same date in discovery order and hash is the first
//! eight hex digits of SHA-256 over `description|amount`. Re-parsing the same
//! input gives the same references; nothing is deduplicated.

use std::collections::HashMap;

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::formats::Format;
use crate::types::Draft;

fn content_hash(draft: &Draft) -> String {
    let mut hasher = Sha256::new();
    hasher.update(draft.description.as_bytes());
    hasher.update(b"|");
    hasher.update(draft.amount.to_string().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}

pub fn reference(format: &Format, draft: &Draft, position: usize) -> String {
    format!(
        "{}-{}-{:04}-{}",
        format.profile().reference_prefix,
        draft.date.format("%Y%m%d"),
        position,
        content_hash(draft)
    )
}

/// Hands out per-date positions in the order drafts are seen.
#[derive(Debug, Default)]
pub struct Positions {
    next: HashMap<NaiveDate, usize>,
}

impl Positions {
    pub fn next(&mut self, date: NaiveDate) -> usize {
        let slot = self.next.entry(date).or_insert(0);
        let position = *slot;
        *slot += 1;
        position
    }
}
