//! Dispatch history tracking.
//!
//! A bounded, ordered log of the commands a store applied, in the spirit of
//! a devtools action log. Records are immutable values; the log evicts the
//! oldest record once it reaches its limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single applied command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// Position of the command in the store's lifetime, starting at 1
    pub sequence: u64,
    /// The command kind
    pub kind: String,
    /// Whether the reducer produced a new state snapshot
    pub changed: bool,
    /// When the command was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of applied commands.
///
/// # Example
///
/// ```rust
/// use reductor::core::DispatchHistory;
///
/// let mut history = DispatchHistory::with_limit(2);
/// history.record("task/add", true);
/// history.record("task/add", true);
/// history.record("task/delete", true);
///
/// assert_eq!(history.kinds(), vec!["task/add", "task/delete"]);
/// assert_eq!(history.records()[0].sequence, 2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatchHistory {
    limit: usize,
    next_sequence: u64,
    records: VecDeque<DispatchRecord>,
}

impl DispatchHistory {
    /// Create an empty history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            next_sequence: 1,
            records: VecDeque::with_capacity(limit.min(64)),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, kind: &str, changed: bool) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        if self.limit == 0 {
            return;
        }
        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(DispatchRecord {
            sequence,
            kind: kind.to_string(),
            changed,
            timestamp: Utc::now(),
        });
    }

    /// Apply a new bound, dropping the oldest records that no longer fit.
    ///
    /// Sequence numbers and the total are kept.
    pub fn rebound(mut self, limit: usize) -> Self {
        self.limit = limit;
        while self.records.len() > limit {
            self.records.pop_front();
        }
        self
    }

    /// Verify the counters of a history that was decoded rather than built.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.next_sequence == 0 {
            return Err("sequence counter must start at 1".to_string());
        }
        let mut previous = 0;
        for record in &self.records {
            if record.sequence <= previous || record.sequence >= self.next_sequence {
                return Err(format!("record sequence {} is out of order", record.sequence));
            }
            previous = record.sequence;
        }
        Ok(())
    }

    /// Records from oldest to newest.
    pub fn records(&self) -> Vec<&DispatchRecord> {
        self.records.iter().collect()
    }

    /// Command kinds from oldest to newest.
    pub fn kinds(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.kind.as_str()).collect()
    }

    /// Time between the oldest and newest retained record.
    ///
    /// Returns `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    /// Total number of commands seen, including evicted ones.
    pub fn total(&self) -> u64 {
        self.next_sequence.saturating_sub(1)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
