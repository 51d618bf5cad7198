//! The binary operator a fan-in signal applies to its two upstream values.

use serde::{Deserialize, Serialize};

/// Binary integer operation combining two upstream signal values.
///
/// Wire names are the uppercase variant names (`"ADD"`, `"SUB"`, `"MUL"`,
/// `"DIV"`), matching the spawn-config format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CombineOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl CombineOp {
    /// Apply the operation, or `None` when no i64 result exists (division by
    /// zero, overflow). Callers treat `None` as a soft error and drop the
    /// update.
    pub fn apply(self, left: i64, right: i64) -> Option<i64> {
        match self {
            Self::Add => left.checked_add(right),
            Self::Sub => left.checked_sub(right),
            Self::Mul => left.checked_mul(right),
            Self::Div => left.checked_div(right),
        }
    }

    /// The infix symbol used by the command grammar.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Map a command-grammar symbol back to an operator.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }
}

impl std::fmt::Display for CombineOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for CombineOp {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADD" => Ok(Self::Add),
            "SUB" => Ok(Self::Sub),
            "MUL" => Ok(Self::Mul),
            "DIV" => Ok(Self::Div),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

/// Error for an operator name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator '{0}', expected one of ADD, SUB, MUL, DIV")]
pub struct UnknownOperator(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_basic_arithmetic() {
        assert_eq!(CombineOp::Add.apply(1, 2), Some(3));
        assert_eq!(CombineOp::Sub.apply(1, 2), Some(-1));
        assert_eq!(CombineOp::Mul.apply(3, 4), Some(12));
        assert_eq!(CombineOp::Div.apply(9, 2), Some(4));
    }

    #[test]
    fn division_by_zero_yields_none() {
        assert_eq!(CombineOp::Div.apply(1, 0), None);
        assert_eq!(CombineOp::Div.apply(i64::MIN, -1), None);
    }

    #[test]
    fn overflow_yields_none() {
        assert_eq!(CombineOp::Add.apply(i64::MAX, 1), None);
        assert_eq!(CombineOp::Mul.apply(i64::MAX, 2), None);
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("ADD".parse::<CombineOp>().unwrap(), CombineOp::Add);
        assert_eq!("DIV".parse::<CombineOp>().unwrap(), CombineOp::Div);
        assert!("MOD".parse::<CombineOp>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&CombineOp::Add).unwrap(), r#""ADD""#);
        let parsed: CombineOp = serde_json::from_str(r#""MUL""#).unwrap();
        assert_eq!(parsed, CombineOp::Mul);
    }

    #[test]
    fn symbols_round_trip() {
        for op in [CombineOp::Add, CombineOp::Sub, CombineOp::Mul, CombineOp::Div] {
            assert_eq!(CombineOp::from_symbol(op.symbol()), Some(op));
        }
    }
}
