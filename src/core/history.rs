//! Bounded log of completed transitions.
//!
//! History is opt-in per machine. When enabled it keeps at most `capacity`
//! records and drops the oldest one first.

use crate::core::event::EventId;
use crate::core::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single completed transition.
///
/// # Example
///
/// ```rust
/// use statetree::core::{StateId, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     event: 2,
///     source: StateId(2),
///     from: StateId(3),
///     to: StateId(6),
///     timestamp: Utc::now(),
/// };
/// assert!(record.changed_leaf());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Event that triggered the transition
    pub event: EventId,
    /// State whose handler declared the transition
    pub source: StateId,
    /// Leaf that was current when the event arrived
    pub from: StateId,
    /// Leaf the machine settled on
    pub to: StateId,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// False for transitions that exited and re-entered the same leaf.
    pub fn changed_leaf(&self) -> bool {
        self.from != self.to
    }
}

/// Ordered, bounded transition history.
///
/// # Example
///
/// ```rust
/// use statetree::core::{StateId, TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_capacity(2);
/// for (from, to) in [(1, 2), (2, 3), (3, 4)] {
///     history.record(TransitionRecord {
///         event: 0,
///         source: StateId(from),
///         from: StateId(from),
///         to: StateId(to),
///         timestamp: Utc::now(),
///     });
/// }
///
/// // The oldest record was dropped.
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec![StateId(2), StateId(3), StateId(4)]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl TransitionHistory {
    /// Create an empty history keeping at most `capacity` records.
    ///
    /// A capacity of zero records nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Leaves visited: the `from` of the oldest record, then the `to` of
    /// every record.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|record| record.to));
        path
    }

    /// Time between the oldest and newest record.
    ///
    /// Returns `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Records from oldest to newest.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
