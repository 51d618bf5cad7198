//! The provenance token that travels with every value update.
//!
//! A chain records the id of each signal a value has passed through together
//! with that signal's event counter at the time. The full dependency graph is
//! deliberately not carried along; every signal already holds the graphs of
//! its upstreams, so ids and counters are enough to answer the freshness
//! question the glitch check asks.

use serde::{Deserialize, Serialize};

/// One hop in a [`SignalChain`]: a signal id and its event counter.
///
/// A counter of -1 means the counter was never set, which is how chains
/// produced by path enumeration look before any event has traveled them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub id: String,
    pub counter: i64,
}

/// Mutable, append-only sequence of `(id, counter)` entries.
///
/// Entries are never reordered. The JSON form is
/// `{"entries":[{"id":…,"counter":…}, …]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalChain {
    entries: Vec<ChainEntry>,
}

impl SignalChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain containing a single entry.
    pub fn single(id: impl Into<String>, counter: i64) -> Self {
        let mut chain = Self::new();
        chain.push(id, counter);
        chain
    }

    /// Append an entry. Pass -1 as the counter to leave it unspecified.
    pub fn push(&mut self, id: impl Into<String>, counter: i64) {
        self.entries.push(ChainEntry {
            id: id.into(),
            counter,
        });
    }

    /// Whether any entry carries the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// The id of the last entry, or `None` for an empty chain.
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.id.as_str())
    }

    /// The counter of the first entry with the given id, scanning from the
    /// head, or -1 if the id does not appear.
    pub fn counter_for(&self, id: &str) -> i64 {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.counter)
            .unwrap_or(-1)
    }

    /// The id immediately following the first occurrence of `id`, which is
    /// the signal `id` sent its value to along this chain. `None` when `id`
    /// is absent or is the final entry.
    pub fn next_signal(&self, id: &str) -> Option<&str> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        self.entries
            .get(position + 1)
            .map(|entry| entry.id.as_str())
    }

    /// Ids present in both chains whose successor differs between the two.
    ///
    /// A shared id whose successors agree (including both being absent) is
    /// not a conflict; any other combination is. Event counters are not
    /// consulted here. The result is symmetric as a set:
    /// `a.conflicts(b)` and `b.conflicts(a)` contain the same ids.
    pub fn conflicts(&self, other: &SignalChain) -> Vec<String> {
        let mut conflicts = Vec::new();
        for entry in &self.entries {
            if conflicts.iter().any(|id| id == &entry.id) {
                continue;
            }
            if !other.contains(&entry.id) {
                continue;
            }
            if self.next_signal(&entry.id) != other.next_signal(&entry.id) {
                conflicts.push(entry.id.clone());
            }
        }
        conflicts
    }

    /// The ids of all entries, head first.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize this chain to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a chain from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for SignalChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            write!(f, "[{},{}]", entry.id, entry.counter)?;
        }
        Ok(())
    }
}
