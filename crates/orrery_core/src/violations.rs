//! Bounded record of boundary violations for the host to act on.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    /// 1-based, monotonic over the life of the log.
    pub sequence: u64,
    pub operation: String,
    pub message: String,
}

/// Keeps the most recent `capacity` violations and a running total.
///
/// Reaching the budget only flips [`Self::budget_exhausted`]; deciding what
/// to do about it belongs to the host. Records are appended through a
/// shared reference so read-only views can report.
#[derive(Debug)]
pub struct ViolationLog {
    capacity: usize,
    budget: u64,
    total: Cell<u64>,
    records: RefCell<VecDeque<ViolationRecord>>,
}

impl ViolationLog {
    pub const DEFAULT_CAPACITY: usize = 64;
    pub const DEFAULT_BUDGET: u64 = 10;

    pub fn new(capacity: usize, budget: u64) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            budget,
            total: Cell::new(0),
            records: RefCell::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn record(&self, operation: &str, message: impl Into<String>) -> u64 {
        let sequence = self.total.get() + 1;
        self.total.set(sequence);
        let message = message.into();
        warn!(operation, sequence, %message, "boundary violation");

        let mut records = self.records.borrow_mut();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(ViolationRecord {
            sequence,
            operation: operation.to_owned(),
            message,
        });
        drop(records);

        if sequence == self.budget {
            warn!(budget = self.budget, "violation budget exhausted");
        }
        sequence
    }

    /// Violations recorded since creation, including drained ones.
    pub fn total(&self) -> u64 {
        self.total.get()
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn budget_exhausted(&self) -> bool {
        self.total.get() >= self.budget
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Copy of the retained records, oldest first.
    pub fn records(&self) -> Vec<ViolationRecord> {
        self.records.borrow().iter().cloned().collect()
    }

    /// Take the retained records. The total is unaffected.
    pub fn drain(&self) -> Vec<ViolationRecord> {
        self.records.borrow_mut().drain(..).collect()
    }
}

impl Default for ViolationLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, Self::DEFAULT_BUDGET)
    }
}
