//! Chronological reconstruction.
//!
//! Statements carry no time of day, only a running balance. Output is most
//! recent date first; inside a date, a higher balance is taken to mean the
//! transaction happened earlier. Transactions without a balance keep their
//! discovery position, and equal balances keep discovery order.
//!
//! Sorting works on [`Group`]s (everything one block emitted) so a fee stays
//! directly behind its parent.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::ParsedTransaction;

/// Transactions emitted by one block, parent first. They share date and balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub date: NaiveDate,
    pub balance: Option<Decimal>,
    pub transactions: Vec<ParsedTransaction>,
}

impl Group {
    pub fn single(transaction: ParsedTransaction) -> Self {
        Self {
            date: transaction.date,
            balance: transaction.balance,
            transactions: vec![transaction],
        }
    }
}

/// Order groups (given in discovery order) and flatten them.
pub fn reconstruct(groups: Vec<Group>) -> Vec<ParsedTransaction> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| groups[b].date.cmp(&groups[a].date));

    for day in order.chunk_by_mut(|&a, &b| groups[a].date == groups[b].date) {
        // Slots held by balanced groups are refilled in balance order;
        // unbalanced groups never move.
        let slots: Vec<usize> = (0..day.len())
            .filter(|&k| groups[day[k]].balance.is_some())
            .collect();
        let mut balanced: Vec<usize> = slots.iter().map(|&k| day[k]).collect();
        balanced.sort_by(|&a, &b| groups[b].balance.cmp(&groups[a].balance));
        for (k, idx) in slots.into_iter().zip(balanced) {
            day[k] = idx;
        }
    }

    let mut groups: Vec<Option<Group>> = groups.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| groups[i].take())
        .flat_map(|g| g.transactions)
        .collect()
}
