//! Signal Kernel: distributed functional-reactive integer signals.
//!
//! Each signal is an independent actor owning a 64-bit integer value and the
//! dependency graph of everything upstream of it. Signals communicate only
//! through the broker: value updates are broadcast with a provenance chain
//! attached, and a fan-in signal uses the event counters embedded in those
//! chains to refuse transient inconsistent states in diamond-shaped graphs
//! (glitch avoidance) without any global coordinator.
//!
//! ## Quick Start
//!
//! ```ignore
//! use acton_reactive::prelude::*;
//! use signal_kernel::{Command, CombineOp, SignalRegistry};
//!
//! let mut runtime = ActonApp::launch_async().await;
//! let mut registry = SignalRegistry::new();
//!
//! // x = 0, y mirrors x, z = x + y
//! registry.execute(&mut runtime, Command::Create { id: "x".into(), initial: 0 }).await?;
//! registry.execute(&mut runtime, Command::Map { id: "y".into(), source: "x".into() }).await?;
//! registry.execute(&mut runtime, Command::Combine {
//!     id: "z".into(),
//!     left: "x".into(),
//!     right: "y".into(),
//!     op: CombineOp::Add,
//! }).await?;
//!
//! // every value z publishes is even, never a half-propagated sum
//! registry.execute(&mut runtime, Command::Increment("x".into())).await?;
//! ```

pub mod actors;
pub mod chain;
pub mod command;
pub mod config;
pub mod glitch;
pub mod graph;
pub mod messages;
pub mod operator;
pub mod tracker;

pub use actors::{SignalActor, SignalActorState};
pub use chain::{ChainEntry, SignalChain};
pub use command::{Command, CommandError, SignalRegistry, DEFAULT_STARTUP_TIMEOUT};
pub use config::SignalConfig;
pub use graph::SignalGraph;
pub use messages::{
    GraphRequest, GraphResponse, Increment, PrintGraph, PrintValue, SetBlocked,
    SetGlitchAvoidance, SignalUpdate,
};
pub use operator::CombineOp;
pub use tracker::DependencyTracker;
