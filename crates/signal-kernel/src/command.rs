//! The command layer: requests that spawn signals or send control messages.
//!
//! Commands are thin request builders. Spawning commands validate their
//! config, spawn a [`SignalActor`] and wait for its startup handshake to
//! finish; control commands resolve the target's handle in the registry and
//! send one message. Configuration errors surface synchronously from
//! [`SignalRegistry::execute`] and never start an actor.

use std::collections::HashMap;
use std::time::Duration;

use acton_reactive::prelude::*;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::warn;

use crate::actors::SignalActor;
use crate::config::SignalConfig;
use crate::messages::{Increment, PrintGraph, PrintValue, SetBlocked, SetGlitchAvoidance};
use crate::operator::CombineOp;

/// A request against the signal runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an independent source signal with an initial value.
    Create { id: String, initial: i64 },
    /// Create a signal mirroring a single upstream.
    Map { id: String, source: String },
    /// Create a signal combining two upstreams with a binary operator.
    Combine {
        id: String,
        left: String,
        right: String,
        op: CombineOp,
    },
    /// Increment a signal's value by one.
    Increment(String),
    /// Block or unblock a signal's value publications.
    Block { id: String, blocked: bool },
    /// Enable or disable glitch avoidance on a signal.
    Glitches { id: String, enabled: bool },
    /// Log a signal's current value.
    Print(String),
    /// Log a signal's dependency graph.
    PrintGraph(String),
}

/// Error executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("signal id must not be empty")]
    EmptyId,

    #[error("signal '{0}' already exists")]
    DuplicateSignal(String),

    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    #[error("signal '{id}' declares {count} dependencies, at most 2 are supported")]
    UnsupportedArity { id: String, count: usize },

    #[error("signal '{0}' combines two upstreams but declares no operator")]
    MissingOperator(String),

    #[error("timed out waiting for signal '{id}' to gather its dependency graphs")]
    StartupTimeout { id: String },
}

/// Default deadline for a spawned signal's dependency discovery.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Owner of the id → actor handle map.
///
/// The registry plays the naming role the bus's address table played in the
/// wire protocol: control messages are routed by looking the target id up
/// here. Requiring upstream ids to already be registered when a signal is
/// created also makes dependency cycles unrepresentable.
pub struct SignalRegistry {
    signals: HashMap<String, ActorHandle>,
    startup_timeout: Duration,
}

impl SignalRegistry {
    /// Create an empty registry with the default startup timeout.
    pub fn new() -> Self {
        Self::with_startup_timeout(DEFAULT_STARTUP_TIMEOUT)
    }

    /// Create an empty registry with a custom startup timeout.
    pub fn with_startup_timeout(startup_timeout: Duration) -> Self {
        Self {
            signals: HashMap::new(),
            startup_timeout,
        }
    }

    /// Whether a signal with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.signals.contains_key(id)
    }

    /// The handle for a signal, if registered.
    pub fn handle(&self, id: &str) -> Option<&ActorHandle> {
        self.signals.get(id)
    }

    /// Ids of all registered signals, in no particular order.
    pub fn ids(&self) -> Vec<&str> {
        self.signals.keys().map(String::as_str).collect()
    }

    /// Execute a command against the runtime.
    pub async fn execute(
        &mut self,
        runtime: &mut ActorRuntime,
        command: Command,
    ) -> Result<(), CommandError> {
        match command {
            Command::Create { id, initial } => {
                self.spawn_signal(runtime, SignalConfig::source(id, initial))
                    .await
            }
            Command::Map { id, source } => {
                self.spawn_signal(runtime, SignalConfig::map(id, source)).await
            }
            Command::Combine {
                id,
                left,
                right,
                op,
            } => {
                self.spawn_signal(runtime, SignalConfig::combine(id, left, right, op))
                    .await
            }
            Command::Increment(id) => {
                let handle = self.lookup(&id)?.clone();
                handle.send(Increment).await;
                Ok(())
            }
            Command::Block { id, blocked } => {
                let handle = self.lookup(&id)?.clone();
                handle.send(SetBlocked(blocked)).await;
                Ok(())
            }
            Command::Glitches { id, enabled } => {
                let handle = self.lookup(&id)?.clone();
                handle.send(SetGlitchAvoidance(enabled)).await;
                Ok(())
            }
            Command::Print(id) => {
                let handle = self.lookup(&id)?.clone();
                handle.send(PrintValue).await;
                Ok(())
            }
            Command::PrintGraph(id) => {
                let handle = self.lookup(&id)?.clone();
                handle.send(PrintGraph).await;
                Ok(())
            }
        }
    }

    /// Validate a config, spawn the actor and wait for its startup to finish.
    ///
    /// On timeout the signal is not registered; the actor never entered
    /// Ready and will keep answering graph requests with an empty body.
    async fn spawn_signal(
        &mut self,
        runtime: &mut ActorRuntime,
        config: SignalConfig,
    ) -> Result<(), CommandError> {
        config.validate()?;

        if self.signals.contains_key(&config.id) {
            return Err(CommandError::DuplicateSignal(config.id));
        }
        for upstream in &config.dependencies {
            if !self.signals.contains_key(upstream) {
                return Err(CommandError::UnknownSignal(upstream.clone()));
            }
        }

        let id = config.id.clone();
        let (ready_tx, ready_rx) = oneshot::channel();
        let handle = SignalActor::new(config, ready_tx).spawn(runtime).await;

        match tokio::time::timeout(self.startup_timeout, ready_rx).await {
            Ok(Ok(())) => {
                self.signals.insert(id, handle);
                Ok(())
            }
            _ => {
                warn!(id = %id, "signal did not finish dependency discovery in time");
                Err(CommandError::StartupTimeout { id })
            }
        }
    }

    fn lookup(&self, id: &str) -> Result<&ActorHandle, CommandError> {
        self.signals
            .get(id)
            .ok_or_else(|| CommandError::UnknownSignal(id.to_string()))
    }
}

impl Default for SignalRegistry {
    fn default() -> Self {
        Self::new()
    }
}
