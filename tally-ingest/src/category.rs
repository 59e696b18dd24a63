//! Category tagging from the bank's own vocabulary.
//!
//! Statements print the category in the column just left of the money
//! columns, so a label ending the pre-amount text is taken first (longest
//! label wins, so "Transfers" beats "Transfer") and cut from the description.
//! Otherwise the first vocabulary label found anywhere is used and the
//! description is left intact.

use crate::block::join_fragments;
use crate::formats::Format;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged {
    pub description: String,
    pub category: Option<String>,
}

/// Byte offset where `label` starts if `text` ends with it as a whole word.
fn label_suffix(text: &str, label: &str) -> Option<usize> {
    let start = text.len().checked_sub(label.len())?;
    if label.is_empty() || !text.is_char_boundary(start) {
        return None;
    }
    let boundary = !text[..start].ends_with(|c: char| c.is_alphanumeric());
    (boundary && text[start..].eq_ignore_ascii_case(label)).then_some(start)
}

/// Tag `head` (text before the first amount) and `tail` (text after it).
pub fn tag(head: &str, tail: &str, format: &Format) -> Tagged {
    let vocabulary = &format.profile().categories;

    let mut by_length: Vec<&String> = vocabulary.iter().collect();
    by_length.sort_by_key(|l| std::cmp::Reverse(l.len()));

    if let Some((label, start)) = by_length
        .iter()
        .find_map(|l| label_suffix(head, l).map(|s| (*l, s)))
    {
        return Tagged {
            description: describe(&head[..start], tail, Some(label.as_str())),
            category: Some(label.clone()),
        };
    }

    let category = format.categories().first_in(&[head, tail]).map(str::to_string);

    Tagged {
        description: describe(head, tail, category.as_deref()),
        category,
    }
}

fn describe(head: &str, tail: &str, category: Option<&str>) -> String {
    let description = join_fragments(&[head, tail]);
    if description.is_empty() {
        return category.unwrap_or_default().to_string();
    }
    description
}
