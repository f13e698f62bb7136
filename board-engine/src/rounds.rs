//! Round tracker - fairness cycles
//!
//! A round is complete exactly when every currently-eligible therapist has
//! received at least one auto-assigned entry in it. The entry that completes
//! a round still belongs to that round; the caller closes the round and
//! resets the fairness queue afterwards.

use std::collections::HashMap;

/// Current round number plus per-therapist counts for the open round
#[derive(Debug, Clone)]
pub struct RoundTracker {
    current_round: u32,
    counts: HashMap<String, u32>,
}

impl Default for RoundTracker {
    fn default() -> Self {
        Self {
            current_round: 1,
            counts: HashMap::new(),
        }
    }
}

impl RoundTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Whether the therapist has not yet been served this round
    pub fn is_fresh(&self, name: &str) -> bool {
        self.count(name) == 0
    }

    /// Record an auto assignment; returns true when, after this increment,
    /// every eligible therapist has a count of at least one.
    pub fn record_assignment(&mut self, name: &str, eligible: &[String]) -> bool {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
        !eligible.is_empty() && eligible.iter().all(|t| self.count(t) > 0)
    }

    /// Close the completed round: clear counts and open the next round.
    /// The caller is responsible for resetting the fairness queue.
    pub fn close_round(&mut self) {
        self.counts.clear();
        self.current_round += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eligible(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_round_completes_when_everyone_served() {
        let mut r = RoundTracker::new();
        let roster = eligible(&["A", "B"]);
        assert!(!r.record_assignment("A", &roster));
        assert!(r.record_assignment("B", &roster));
    }

    #[test]
    fn test_repeat_assignment_does_not_complete() {
        let mut r = RoundTracker::new();
        let roster = eligible(&["A", "B"]);
        assert!(!r.record_assignment("A", &roster));
        assert!(!r.record_assignment("A", &roster));
        assert_eq!(r.count("A"), 2);
    }

    #[test]
    fn test_close_round_resets_counts_and_increments() {
        let mut r = RoundTracker::new();
        let roster = eligible(&["A"]);
        assert!(r.record_assignment("A", &roster));
        r.close_round();
        assert_eq!(r.current_round(), 2);
        assert_eq!(r.count("A"), 0);
        assert!(r.is_fresh("A"));
    }

    #[test]
    fn test_empty_roster_never_completes() {
        let mut r = RoundTracker::new();
        assert!(!r.record_assignment("A", &[]));
    }
}
