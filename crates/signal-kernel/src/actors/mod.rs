//! Acton-reactive actors for the signal runtime.
//!
//! Every signal is one actor. Startup and steady state:
//!
//! ```text
//! spawn(config)
//!   ├─ subscribe GraphRequest / GraphResponse / SignalUpdate (broker)
//!   ├─ after_start: GraphRequest (broadcast, one per declared upstream)
//!   │    └─ GraphResponse ← each upstream (broadcast, correlation id)
//!   ├─ all replies in → graph assembled → conflict set precomputed → Ready
//!   │
//!   ├─ SignalUpdate ← upstream (broadcast, filtered on source)
//!   │    └─ glitch check → SignalUpdate (broadcast) to downstreams
//!   └─ Increment / SetBlocked / SetGlitchAvoidance / PrintValue / PrintGraph
//!        (direct sends from the command layer)
//! ```
//!
//! The actor mailbox serializes handlers, so all state is owned by the actor
//! with no locking; bus I/O happens in deferred replies.

mod signal_actor;

pub use signal_actor::{Observation, SignalActor, SignalActorState};
