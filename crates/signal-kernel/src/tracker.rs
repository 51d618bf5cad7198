//! Dependency discovery bookkeeping for a starting signal.
//!
//! A signal with upstreams cannot assemble its own [`SignalGraph`] until every
//! upstream has replied with its graph. The tracker owns that accumulation:
//! the actor broadcasts the requests the tracker builds, feeds replies back in
//! by declared index, and only once every slot is filled does the assembled
//! graph become visible. Partial graphs are never exposed.

use crate::graph::SignalGraph;
use crate::messages::GraphRequest;

/// Per-signal accumulator for upstream graph replies.
///
/// Replies are stored at the index the dependency was declared at, not in
/// arrival order, so the assembled graph (and later, operator application)
/// sees upstreams in config order.
#[derive(Debug, Clone, Default)]
pub struct DependencyTracker {
    id: String,
    declared: Vec<String>,
    discovered: Vec<Option<SignalGraph>>,
    graph: Option<SignalGraph>,
}

impl DependencyTracker {
    /// Create a tracker for the signal `id` with the declared upstream ids.
    ///
    /// With no upstreams the leaf graph is assembled immediately and the
    /// tracker starts complete.
    pub fn new(id: impl Into<String>, declared: Vec<String>) -> Self {
        let id = id.into();
        let graph = declared.is_empty().then(|| SignalGraph::leaf(&id));
        let discovered = vec![None; declared.len()];
        Self {
            id,
            declared,
            discovered,
            graph,
        }
    }

    /// One graph request per declared upstream, carrying the declared index
    /// so the reply can be slotted back in order.
    pub fn graph_requests(&self, correlation_id: &str) -> Vec<GraphRequest> {
        self.declared
            .iter()
            .enumerate()
            .map(|(index, target)| GraphRequest {
                correlation_id: correlation_id.to_string(),
                target: target.clone(),
                index,
            })
            .collect()
    }

    /// Record an upstream's graph reply at its declared index.
    ///
    /// Returns true when this reply completed the set and the signal's own
    /// graph has been assembled. Out-of-range indices and duplicate replies
    /// are ignored.
    pub fn record(&mut self, index: usize, graph: SignalGraph) -> bool {
        if self.graph.is_some() {
            return false;
        }
        match self.discovered.get_mut(index) {
            Some(slot) if slot.is_none() => *slot = Some(graph),
            _ => return false,
        }

        if self.discovered.iter().all(Option::is_some) {
            let upstreams: Vec<SignalGraph> =
                self.discovered.iter().flatten().cloned().collect();
            self.graph = Some(SignalGraph::with_dependencies(&self.id, upstreams));
            true
        } else {
            false
        }
    }

    /// The assembled graph, available only once every upstream has replied.
    pub fn graph(&self) -> Option<&SignalGraph> {
        self.graph.as_ref()
    }

    /// Whether every upstream reply has arrived and the graph is assembled.
    pub fn is_complete(&self) -> bool {
        self.graph.is_some()
    }

    /// Direct upstream graphs in declared order. Empty until complete.
    pub fn dependencies(&self) -> &[SignalGraph] {
        self.graph
            .as_ref()
            .map(|graph| graph.dependencies())
            .unwrap_or(&[])
    }

    /// Declared upstream ids, in config order.
    pub fn dependency_ids(&self) -> &[String] {
        &self.declared
    }

    /// Number of declared upstreams. Fixed at construction.
    pub fn number_of_dependencies(&self) -> usize {
        self.declared.len()
    }

    /// Whether `id` is one of this signal's direct upstreams.
    pub fn is_upstream(&self, id: &str) -> bool {
        self.declared.iter().any(|declared| declared == id)
    }
}
