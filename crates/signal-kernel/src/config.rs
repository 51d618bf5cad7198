//! Spawn configuration for a signal actor.

use serde::{Deserialize, Serialize};

use crate::command::CommandError;
use crate::operator::CombineOp;

/// Everything a signal actor needs to start.
///
/// The JSON form uses the wire field names `id`, `initialValue`, `operator`
/// and `dependencies`. Declared dependency order is semantically significant:
/// a fan-in signal applies its operator to values in this order, so
/// `x - y` and `y - x` are different configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalConfig {
    /// Unique signal id. Non-empty.
    pub id: String,

    /// Starting value; defaults to 0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<i64>,

    /// Combine operator for fan-in signals. Required when two dependencies
    /// are declared, meaningless otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<CombineOp>,

    /// Ids of direct upstream signals, in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl SignalConfig {
    /// Config for an independent source signal.
    pub fn source(id: impl Into<String>, initial_value: i64) -> Self {
        Self {
            id: id.into(),
            initial_value: Some(initial_value),
            operator: None,
            dependencies: Vec::new(),
        }
    }

    /// Config for a signal mirroring a single upstream.
    pub fn map(id: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial_value: None,
            operator: None,
            dependencies: vec![upstream.into()],
        }
    }

    /// Config for a signal combining two upstreams with an operator.
    pub fn combine(
        id: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
        operator: CombineOp,
    ) -> Self {
        Self {
            id: id.into(),
            initial_value: None,
            operator: Some(operator),
            dependencies: vec![left.into(), right.into()],
        }
    }

    /// Reject configurations the runtime cannot execute.
    ///
    /// The runtime supports operators of arity two; more dependencies than
    /// that, or a two-dependency config without an operator, is a
    /// configuration error surfaced before the actor is spawned.
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.id.is_empty() {
            return Err(CommandError::EmptyId);
        }
        if self.dependencies.len() > 2 {
            return Err(CommandError::UnsupportedArity {
                id: self.id.clone(),
                count: self.dependencies.len(),
            });
        }
        if self.dependencies.len() == 2 && self.operator.is_none() {
            return Err(CommandError::MissingOperator(self.id.clone()));
        }
        Ok(())
    }
}
