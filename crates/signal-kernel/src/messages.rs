//! Message types for signal actor communication.
//!
//! Broker broadcasts don't preserve sender identity, so every broadcast
//! message embeds the addressing the topic string carried in the wire
//! protocol: the publishing signal's id on value updates, the target id and
//! correlation id on graph discovery. Control messages are sent directly to
//! an actor handle and need no addressing fields.

use serde::{Deserialize, Serialize};

use crate::chain::SignalChain;
use crate::graph::SignalGraph;

/// A value update, broadcast on a signal's value channel.
///
/// Subscribers filter on `source` against their declared upstream set. The
/// broker hands every subscriber its own clone, so appending to the chain
/// downstream cannot corrupt a sibling's copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalUpdate {
    /// Id of the publishing signal.
    #[serde(skip)]
    pub source: String,
    /// The new value.
    pub value: i64,
    /// Provenance of this value: every signal it passed through, each tagged
    /// with that signal's event counter at publication time.
    pub chain: SignalChain,
}

/// Request for a signal's dependency graph - broadcast during startup
/// dependency discovery.
#[derive(Debug, Clone)]
pub struct GraphRequest {
    /// Correlation id of the requesting signal's discovery round.
    pub correlation_id: String,
    /// Id of the signal being asked for its graph.
    pub target: String,
    /// Index of this upstream in the requester's declared dependency order.
    pub index: usize,
}

/// Reply to a [`GraphRequest`] - broadcast by the target signal.
#[derive(Debug, Clone)]
pub struct GraphResponse {
    /// Correlation id echoed from the request.
    pub correlation_id: String,
    /// Declared-order index echoed from the request.
    pub index: usize,
    /// The target's graph, or `None` if the target has not finished its own
    /// startup yet.
    pub graph: Option<SignalGraph>,
}

/// Increment the signal's value by one and publish.
#[derive(Debug, Clone)]
pub struct Increment;

/// Block or unblock value publication. A blocked signal keeps computing
/// updates but publishes nothing.
#[derive(Debug, Clone)]
pub struct SetBlocked(pub bool);

/// Enable or disable the glitch check on the dependency-update path. With
/// avoidance off every fan-in update is applied unconditionally.
#[derive(Debug, Clone)]
pub struct SetGlitchAvoidance(pub bool);

/// Log the signal's current value.
#[derive(Debug, Clone)]
pub struct PrintValue;

/// Log the signal's dependency graph.
#[derive(Debug, Clone)]
pub struct PrintGraph;
