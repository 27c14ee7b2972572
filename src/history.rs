use rust_decimal::Decimal;

use crate::clock::Timestamp;
use crate::transaction::TransactionKind;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: Timestamp,
}

/// Append-only record of the successful operations on one account.
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<LogEntry>,
}

impl TransactionLog {
    pub fn new() -> Self {
        TransactionLog {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of `kind` entries logged on the same calendar day as `now`,
    /// judged in `now`'s offset.
    pub fn count_on(&self, kind: TransactionKind, now: &Timestamp) -> usize {
        let today = now.date_naive();
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .filter(|entry| entry.timestamp.with_timezone(now.offset()).date_naive() == today)
            .count()
    }
}
