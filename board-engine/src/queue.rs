//! Fairness queue - the rotating order in which eligible therapists are
//! offered new auto-assigned work
//!
//! The queue holds therapist names without duplicates plus a cursor pointing
//! at the therapist due next. Membership always mirrors the eligible roster;
//! `resync` re-establishes that after any clock-in/out change.

use serde::{Deserialize, Serialize};

/// Rotation order plus cursor
///
/// Invariant: `cursor < order.len()` whenever the queue is non-empty;
/// `cursor == 0` when it is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FairnessQueue {
    order: Vec<String>,
    cursor: usize,
}

impl FairnessQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.order.iter().any(|n| n == name)
    }

    /// Therapist the cursor currently points at
    pub fn cursor_target(&self) -> Option<&str> {
        self.order.get(self.cursor).map(String::as_str)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    /// Reconcile membership with the eligible roster: keep existing order for
    /// names still eligible (stable filter), append newcomers at the end.
    /// The cursor follows its former target; if that target left the queue,
    /// or the queue became empty, it resets to 0.
    pub fn resync(&mut self, eligible: &[String]) {
        let former_target = self.cursor_target().map(str::to_string);

        let mut next: Vec<String> = self
            .order
            .iter()
            .filter(|n| eligible.contains(n))
            .cloned()
            .collect();
        for name in eligible {
            if !next.contains(name) {
                next.push(name.clone());
            }
        }
        self.order = next;

        self.cursor = former_target
            .and_then(|t| self.index_of(&t))
            .unwrap_or(0);
        self.assert_invariants();
    }

    /// Move the assigned therapist to the back of the queue, adjusting the
    /// cursor so it keeps pointing at the therapist due next:
    /// - assigned was at the cursor: cursor unchanged (the next therapist
    ///   shifts into that slot), wrapping to 0 if the cursor sits at the tail
    /// - assigned was before the cursor: cursor decrements (everyone between
    ///   shifted left by one)
    /// - assigned was after the cursor: no adjustment
    pub fn advance_after_assignment(&mut self, assigned: &str) {
        let Some(i) = self.index_of(assigned) else {
            return;
        };
        let name = self.order.remove(i);
        self.order.push(name);

        if i == self.cursor {
            if self.cursor >= self.order.len().saturating_sub(1) {
                self.cursor = 0;
            }
        } else if i < self.cursor {
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.assert_invariants();
    }

    /// Pull a therapist to the front and point the cursor at them.
    /// Used when an auto-assignment overrides the nominal rotation.
    pub fn promote_to_front(&mut self, name: &str) {
        if let Some(i) = self.index_of(name) {
            let entry = self.order.remove(i);
            self.order.insert(0, entry);
            self.cursor = 0;
        }
        self.assert_invariants();
    }

    /// Replace the queue with the roster verbatim (round completion)
    pub fn reset_to_roster(&mut self, roster: Vec<String>) {
        self.order = roster;
        self.cursor = 0;
    }

    fn assert_invariants(&self) {
        debug_assert!(
            if self.order.is_empty() {
                self.cursor == 0
            } else {
                self.cursor < self.order.len()
            },
            "cursor {} out of bounds for queue of {}",
            self.cursor,
            self.order.len()
        );
    }
}
