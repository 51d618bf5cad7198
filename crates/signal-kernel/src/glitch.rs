//! Glitch detection: the freshness check a fan-in signal runs before it
//! applies an update.
//!
//! A glitch is the transient inconsistency a diamond-downstream signal would
//! observe while the two arms of the diamond have not yet re-converged after
//! an upstream change. The event counter embedded in each chain entry is a
//! per-signal logical clock, so the question "have both arms seen the same
//! event of the shared ancestor?" reduces to a pairwise integer comparison,
//! with no global coordinator involved.

use std::collections::HashSet;

use crate::chain::SignalChain;
use crate::graph::SignalGraph;

/// The ids at which paths through `graph` diverge: the diamond apexes.
///
/// Computed as the union of pairwise conflicts over every path the graph's
/// [`SignalGraph::all_paths`] enumeration produces. A graph with no shared
/// ancestors yields an empty set, and the glitch check degenerates to a
/// no-op.
pub fn conflict_ids(graph: &SignalGraph) -> HashSet<String> {
    let paths = graph.all_paths();
    let mut conflicts = HashSet::new();
    for (i, path) in paths.iter().enumerate() {
        for other in &paths[i + 1..] {
            conflicts.extend(path.conflicts(other));
        }
    }
    conflicts
}

/// Whether the observed chains disagree about any conflict id.
///
/// For each conflict id, every chain that contains it contributes the counter
/// it saw. Two chains reporting different counters for the same id mean one
/// side of the diamond is stale, so the pending recomputation must be
/// dropped. A later arrival re-runs this check and the counters eventually
/// align.
pub fn detect<'a>(
    conflicts: &HashSet<String>,
    chains: impl Iterator<Item = &'a SignalChain> + Clone,
) -> bool {
    for id in conflicts {
        let mut observed: Option<i64> = None;
        for chain in chains.clone() {
            if !chain.contains(id) {
                continue;
            }
            let counter = chain.counter_for(id);
            match observed {
                None => observed = Some(counter),
                Some(previous) if previous != counter => return true,
                Some(_) => {}
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> SignalGraph {
        SignalGraph::with_dependencies(
            "z",
            vec![
                SignalGraph::leaf("x"),
                SignalGraph::with_dependencies("y", vec![SignalGraph::leaf("x")]),
            ],
        )
    }

    fn chain_of(entries: &[(&str, i64)]) -> SignalChain {
        let mut chain = SignalChain::new();
        for (id, counter) in entries {
            chain.push(*id, *counter);
        }
        chain
    }

    #[test]
    fn diamond_apex_is_the_shared_ancestor() {
        let conflicts = conflict_ids(&diamond());
        assert_eq!(conflicts, HashSet::from(["x".to_string()]));
    }

    #[test]
    fn linear_graph_has_no_conflicts() {
        let graph = SignalGraph::with_dependencies(
            "y",
            vec![SignalGraph::with_dependencies(
                "m",
                vec![SignalGraph::leaf("x")],
            )],
        );
        assert!(conflict_ids(&graph).is_empty());
    }

    #[test]
    fn mismatched_counters_are_a_glitch() {
        let conflicts = conflict_ids(&diamond());
        let fresh = chain_of(&[("x", 2)]);
        let stale = chain_of(&[("x", 1), ("y", 1)]);

        assert!(detect(&conflicts, [&fresh, &stale].into_iter()));
    }

    #[test]
    fn aligned_counters_are_not_a_glitch() {
        let conflicts = conflict_ids(&diamond());
        let direct = chain_of(&[("x", 2)]);
        let mapped = chain_of(&[("x", 2), ("y", 2)]);

        assert!(!detect(&conflicts, [&direct, &mapped].into_iter()));
    }

    #[test]
    fn single_observation_is_not_a_glitch() {
        let conflicts = conflict_ids(&diamond());
        let only = chain_of(&[("x", 3), ("y", 1)]);
        let unrelated = chain_of(&[("w", 5)]);

        assert!(!detect(&conflicts, [&only, &unrelated].into_iter()));
    }

    #[test]
    fn empty_conflict_set_never_detects() {
        let conflicts = HashSet::new();
        let a = chain_of(&[("x", 1)]);
        let b = chain_of(&[("x", 2)]);

        assert!(!detect(&conflicts, [&a, &b].into_iter()));
    }
}
