//! The dependency graph a signal holds: its own id plus the recursive
//! graphs of everything upstream of it.

use serde::{Deserialize, Serialize};

use crate::chain::SignalChain;

/// Immutable tree describing a signal and its transitive upstreams.
///
/// A graph is built exactly once, at signal startup, from the startup config
/// and the graphs the direct upstreams reply with. Ids are unique along any
/// single path but may repeat across paths, which is how diamond shapes
/// appear. Equality is structural.
///
/// The JSON form is `{"id": …, "dependencies": [ … ]}`, recursively, and is
/// what travels on the graph-discovery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalGraph {
    id: String,
    #[serde(default)]
    dependencies: Vec<SignalGraph>,
}

impl SignalGraph {
    /// Create a graph for a signal with no upstreams.
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
        }
    }

    /// Create a graph for a signal with the given upstream graphs.
    ///
    /// The order of `dependencies` is the declared dependency order and is
    /// semantically significant for non-commutative operators.
    pub fn with_dependencies(id: impl Into<String>, dependencies: Vec<SignalGraph>) -> Self {
        Self {
            id: id.into(),
            dependencies,
        }
    }

    /// The id of the signal this graph is rooted at.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Direct upstream graphs, in declared order.
    pub fn dependencies(&self) -> &[SignalGraph] {
        &self.dependencies
    }

    /// Enumerate every path from a leaf up to this graph's root.
    ///
    /// Each path is returned as a [`SignalChain`] ordered the way a value
    /// would travel it (leaf first, this signal last), with all event
    /// counters left unset. The returned chains are independent allocations,
    /// so callers may mutate one without affecting its siblings.
    pub fn all_paths(&self) -> Vec<SignalChain> {
        if self.dependencies.is_empty() {
            return vec![SignalChain::single(&self.id, -1)];
        }

        let mut paths = Vec::new();
        for dependency in &self.dependencies {
            for mut chain in dependency.all_paths() {
                chain.push(&self.id, -1);
                paths.push(chain);
            }
        }
        paths
    }

    /// Serialize this graph to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a graph from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn fmt_tree(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.id, indent = depth * 2)?;
        for dependency in &self.dependencies {
            dependency.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for SignalGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_tree(f, 0)
    }
}
