//! SignalActor: the actor owning one signal's value and dependency graph.
//!
//! Each signal subscribes to the value broadcasts of its direct upstreams,
//! re-runs its own computation when they change, and publishes the result
//! with a provenance chain appended. Correctness of the glitch check is
//! local: the actor never sees more than its own graph and the chains its
//! upstreams hand it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use acton_reactive::prelude::*;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::chain::SignalChain;
use crate::config::SignalConfig;
use crate::glitch;
use crate::messages::{
    GraphRequest, GraphResponse, Increment, PrintGraph, PrintValue, SetBlocked,
    SetGlitchAvoidance, SignalUpdate,
};
use crate::operator::CombineOp;
use crate::tracker::DependencyTracker;

/// Latest observation from one direct upstream.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Provenance chain of the observed update.
    pub chain: SignalChain,
    /// The observed value.
    pub value: i64,
}

/// Actor state for a single signal.
#[derive(Default, Clone)]
pub struct SignalActorState {
    /// Unique signal id, immutable after start.
    pub id: String,
    /// Current value.
    pub value: i64,
    /// When blocked, updates still compute but are not published.
    pub blocked: bool,
    /// Whether the glitch check runs on the fan-in path.
    pub glitch_avoidance: bool,
    /// Per-signal logical clock, bumped on every publication.
    pub event_counter: i64,
    /// Combine operator for fan-in signals.
    pub operator: Option<CombineOp>,
    /// Dependency discovery bookkeeping and the assembled graph.
    pub tracker: DependencyTracker,
    /// Latest observation per direct upstream, keyed by upstream id.
    pub last_values: HashMap<String, Observation>,
    /// Diamond apexes of this signal's graph, precomputed once the graph is
    /// assembled.
    pub conflict_ids: HashSet<String>,
    /// Correlation id of this signal's graph-discovery round.
    pub correlation_id: String,
    /// Startup readiness notification for the spawner (wrapped for Clone).
    pub ready_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl std::fmt::Debug for SignalActorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalActorState")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("blocked", &self.blocked)
            .field("glitch_avoidance", &self.glitch_avoidance)
            .field("event_counter", &self.event_counter)
            .field("ready", &self.tracker.is_complete())
            .finish()
    }
}

/// The signal actor.
///
/// Handles:
/// - `GraphRequest` / `GraphResponse` - startup dependency discovery
/// - `SignalUpdate` - upstream value changes (fast path and fan-in)
/// - `Increment`, `SetBlocked`, `SetGlitchAvoidance` - control
/// - `PrintValue`, `PrintGraph` - diagnostics
pub struct SignalActor {
    /// Spawn configuration, already validated by the command layer.
    pub config: SignalConfig,
    /// Fired once dependency discovery completes and the signal is Ready.
    pub ready_tx: oneshot::Sender<()>,
}

impl SignalActor {
    /// Create a new SignalActor from a validated config.
    pub fn new(config: SignalConfig, ready_tx: oneshot::Sender<()>) -> Self {
        Self { config, ready_tx }
    }

    /// Spawn this signal actor in the given runtime.
    ///
    /// The actor will:
    /// 1. Subscribe to graph discovery and upstream value broadcasts
    /// 2. Broadcast one `GraphRequest` per declared upstream on start
    /// 3. Signal readiness once its own graph is assembled
    pub async fn spawn(self, runtime: &mut ActorRuntime) -> ActorHandle {
        let id = self.config.id.clone();
        info!(id = %id, "starting signal");

        let mut actor =
            runtime.new_actor_with_name::<SignalActorState>(format!("Signal:{}", id));

        // Initialize state
        actor.model.id = id;
        actor.model.value = self.config.initial_value.unwrap_or(0);
        actor.model.glitch_avoidance = true;
        actor.model.operator = self.config.operator;
        actor.model.tracker =
            DependencyTracker::new(&self.config.id, self.config.dependencies.clone());
        actor.model.correlation_id = uuid::Uuid::new_v4().to_string();
        actor.model.ready_tx = Arc::new(Mutex::new(Some(self.ready_tx)));

        // Subscribe to broadcasts BEFORE starting. Leaf signals never receive
        // graph replies or upstream updates, so they only answer requests.
        actor.handle().subscribe::<GraphRequest>().await;
        if actor.model.tracker.number_of_dependencies() > 0 {
            actor.handle().subscribe::<GraphResponse>().await;
            actor.handle().subscribe::<SignalUpdate>().await;
        }

        // Kick off dependency discovery on start. A leaf is Ready at once.
        actor.after_start(|actor| {
            let fut: std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + Sync>> =
                if actor.model.tracker.is_complete() {
                    signal_ready(&actor.model.ready_tx);
                    Box::pin(async {})
                } else {
                    let broker = actor.broker().clone();
                    let requests =
                        actor.model.tracker.graph_requests(&actor.model.correlation_id);
                    Box::pin(async move {
                        for request in requests {
                            broker.broadcast(request).await;
                        }
                    })
                };
            fut
        });

        configure_signal_actor(&mut actor);

        actor.start().await
    }
}

/// Configure message handlers for the SignalActor.
fn configure_signal_actor(actor: &mut ManagedActor<Idle, SignalActorState>) {
    // Answer graph requests addressed to this signal. Replies carry the
    // graph only once it is assembled; before that the reply body is empty
    // and the requester keeps waiting.
    actor.act_on::<GraphRequest>(|actor, context| {
        let msg = context.message();
        if msg.target != actor.model.id {
            return Reply::ready();
        }

        let response = GraphResponse {
            correlation_id: msg.correlation_id.clone(),
            index: msg.index,
            graph: actor.model.tracker.graph().cloned(),
        };
        let broker = actor.broker().clone();

        Reply::pending(async move {
            broker.broadcast(response).await;
        })
    });

    // Collect upstream graph replies from our own discovery round.
    actor.mutate_on::<GraphResponse>(|actor, context| {
        let msg = context.message();
        if msg.correlation_id != actor.model.correlation_id {
            return Reply::ready();
        }

        let Some(graph) = msg.graph.clone() else {
            warn!(
                id = %actor.model.id,
                index = msg.index,
                "upstream replied without a graph, still starting up"
            );
            return Reply::ready();
        };

        if actor.model.tracker.record(msg.index, graph) {
            if let Some(graph) = actor.model.tracker.graph() {
                actor.model.conflict_ids = glitch::conflict_ids(graph);
                info!(
                    id = %actor.model.id,
                    upstreams = ?actor.model.tracker.dependency_ids(),
                    conflicts = actor.model.conflict_ids.len(),
                    "dependency graphs assembled"
                );
            }
            signal_ready(&actor.model.ready_tx);
        }

        Reply::ready()
    });

    // Handle an upstream value update.
    actor.mutate_on::<SignalUpdate>(|actor, context| {
        let msg = context.message();
        if !actor.model.tracker.is_upstream(&msg.source) {
            return Reply::ready();
        }

        actor.model.last_values.insert(
            msg.source.clone(),
            Observation {
                chain: msg.chain.clone(),
                value: msg.value,
            },
        );

        let update = msg.clone();
        match process_dependency_update(&mut actor.model, &update) {
            Some(publication) => {
                let broker = actor.broker().clone();
                Reply::pending(async move {
                    broker.broadcast(publication).await;
                })
            }
            None => Reply::ready(),
        }
    });

    // Increment publishes with a fresh chain rooted at this signal.
    actor.mutate_on::<Increment>(|actor, _context| {
        let next = actor.model.value + 1;
        match update_value(&mut actor.model, next, None) {
            Some(publication) => {
                let broker = actor.broker().clone();
                Reply::pending(async move {
                    broker.broadcast(publication).await;
                })
            }
            None => Reply::ready(),
        }
    });

    actor.mutate_on::<SetBlocked>(|actor, context| {
        actor.model.blocked = context.message().0;
        debug!(id = %actor.model.id, blocked = actor.model.blocked, "block flag set");
        Reply::ready()
    });

    actor.mutate_on::<SetGlitchAvoidance>(|actor, context| {
        actor.model.glitch_avoidance = context.message().0;
        debug!(
            id = %actor.model.id,
            glitch_avoidance = actor.model.glitch_avoidance,
            "glitch avoidance set"
        );
        Reply::ready()
    });

    actor.act_on::<PrintValue>(|actor, _context| {
        info!(id = %actor.model.id, value = actor.model.value, "current value");
        Reply::ready()
    });

    actor.act_on::<PrintGraph>(|actor, _context| {
        match actor.model.tracker.graph() {
            Some(graph) => info!(id = %actor.model.id, "dependency graph:\n{}", graph),
            None => info!(id = %actor.model.id, "dependency graph not yet assembled"),
        }
        Reply::ready()
    });
}

/// Run the dependency-update state machine after storing the observation.
///
/// Returns the update to broadcast, if any.
fn process_dependency_update(
    model: &mut SignalActorState,
    update: &SignalUpdate,
) -> Option<SignalUpdate> {
    // A pure map mirrors its single upstream immediately.
    if model.tracker.number_of_dependencies() == 1 {
        return update_value(model, update.value, Some(&update.chain));
    }

    // Fan-in: wait until every upstream has been observed at least once.
    if model.last_values.len() < model.tracker.number_of_dependencies() {
        return None;
    }

    if model.glitch_avoidance {
        let chains = model.last_values.values().map(|obs| &obs.chain);
        if glitch::detect(&model.conflict_ids, chains) {
            debug!(id = %model.id, "glitch detected, holding update");
            return None;
        }
    }

    let result = combine_observations(model)?;
    // The triggering update's chain is canonical; it carries the counters
    // downstream glitch checks depend on.
    update_value(model, result, Some(&update.chain))
}

/// Apply the combine operator to the stored values in declared order.
fn combine_observations(model: &SignalActorState) -> Option<i64> {
    let Some(operator) = model.operator else {
        warn!(id = %model.id, "fan-in update without an operator, dropping");
        return None;
    };

    let ids = model.tracker.dependency_ids();
    let (left, right) = (ids.first()?, ids.get(1)?);
    let left = model.last_values.get(left)?.value;
    let right = model.last_values.get(right)?.value;

    match operator.apply(left, right) {
        Some(result) => Some(result),
        None => {
            warn!(
                id = %model.id,
                operator = %operator,
                left,
                right,
                "operator produced no result, dropping update"
            );
            None
        }
    }
}

/// Store a new value and build the outgoing publication.
///
/// Blocked signals and signals whose graph is not yet assembled update their
/// value but publish nothing. On publication the event counter is bumped and
/// this signal is appended to a clone of the incoming chain, or roots a
/// fresh chain when the update originated here.
fn update_value(
    model: &mut SignalActorState,
    new_value: i64,
    incoming_chain: Option<&SignalChain>,
) -> Option<SignalUpdate> {
    model.value = new_value;
    info!(id = %model.id, value = new_value, "value updated");

    if model.blocked || !model.tracker.is_complete() {
        return None;
    }

    model.event_counter += 1;
    let chain = match incoming_chain {
        Some(incoming) => {
            let mut chain = incoming.clone();
            chain.push(&model.id, model.event_counter);
            chain
        }
        None => SignalChain::single(&model.id, model.event_counter),
    };

    Some(SignalUpdate {
        source: model.id.clone(),
        value: new_value,
        chain,
    })
}

/// Fire the readiness notification, once.
fn signal_ready(ready_tx: &Arc<Mutex<Option<oneshot::Sender<()>>>>) {
    if let Ok(mut guard) = ready_tx.lock() {
        if let Some(tx) = guard.take() {
            // Ignore send errors - the spawner may have timed out already
            let _ = tx.send(());
        }
    }
}
