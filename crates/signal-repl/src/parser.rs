//! The REPL surface grammar.
//!
//! ```text
//! x = 5            create signal x with value 5
//! y = x            create y mirroring x
//! z = x + y        create z combining x and y (+, -, *, /)
//! x++              increment x
//! print x          log x's current value
//! graph x          log x's dependency graph
//! block x          stop x from publishing
//! unblock x        resume publishing
//! glitches z off   disable glitch avoidance on z (on to re-enable)
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use signal_kernel::{CombineOp, Command};

static CREATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)\s*=\s*(-?\d+)$").expect("valid regex"));
static MAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)\s*=\s*([A-Za-z][A-Za-z0-9_]*)$").expect("valid regex")
});
static COMBINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([A-Za-z][A-Za-z0-9_]*)\s*=\s*([A-Za-z][A-Za-z0-9_]*)\s*([+\-*/])\s*([A-Za-z][A-Za-z0-9_]*)$",
    )
    .expect("valid regex")
});
static INCREMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)\+\+$").expect("valid regex"));
static PRINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^print\s+([A-Za-z][A-Za-z0-9_]*)$").expect("valid regex"));
static GRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^graph\s+([A-Za-z][A-Za-z0-9_]*)$").expect("valid regex"));
static BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(block|unblock)\s+([A-Za-z][A-Za-z0-9_]*)$").expect("valid regex"));
static GLITCHES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^glitches\s+([A-Za-z][A-Za-z0-9_]*)\s+(on|off)$").expect("valid regex")
});

/// Error parsing a REPL line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized command '{0}'")]
    Unrecognized(String),

    #[error("value '{0}' is not a 64-bit integer")]
    BadInteger(String),
}

/// Parse one trimmed, non-empty input line into a [`Command`].
pub fn parse(line: &str) -> Result<Command, ParseError> {
    // combine before map before create: all three share the `id = ...` shape
    if let Some(captures) = COMBINE.captures(line) {
        let symbol = captures[3].chars().next().unwrap_or('+');
        let op = CombineOp::from_symbol(symbol)
            .ok_or_else(|| ParseError::Unrecognized(line.to_string()))?;
        return Ok(Command::Combine {
            id: captures[1].to_string(),
            left: captures[2].to_string(),
            right: captures[4].to_string(),
            op,
        });
    }

    if let Some(captures) = CREATE.captures(line) {
        let initial = captures[2]
            .parse::<i64>()
            .map_err(|_| ParseError::BadInteger(captures[2].to_string()))?;
        return Ok(Command::Create {
            id: captures[1].to_string(),
            initial,
        });
    }

    if let Some(captures) = MAP.captures(line) {
        return Ok(Command::Map {
            id: captures[1].to_string(),
            source: captures[2].to_string(),
        });
    }

    if let Some(captures) = INCREMENT.captures(line) {
        return Ok(Command::Increment(captures[1].to_string()));
    }

    if let Some(captures) = PRINT.captures(line) {
        return Ok(Command::Print(captures[1].to_string()));
    }

    if let Some(captures) = GRAPH.captures(line) {
        return Ok(Command::PrintGraph(captures[1].to_string()));
    }

    if let Some(captures) = BLOCK.captures(line) {
        return Ok(Command::Block {
            id: captures[2].to_string(),
            blocked: &captures[1] == "block",
        });
    }

    if let Some(captures) = GLITCHES.captures(line) {
        return Ok(Command::Glitches {
            id: captures[1].to_string(),
            enabled: &captures[2] == "on",
        });
    }

    Err(ParseError::Unrecognized(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create() {
        assert_eq!(
            parse("x = 5").unwrap(),
            Command::Create {
                id: "x".to_string(),
                initial: 5
            }
        );
        assert_eq!(
            parse("counter_1 = -3").unwrap(),
            Command::Create {
                id: "counter_1".to_string(),
                initial: -3
            }
        );
    }

    #[test]
    fn parses_map() {
        assert_eq!(
            parse("y = x").unwrap(),
            Command::Map {
                id: "y".to_string(),
                source: "x".to_string()
            }
        );
    }

    #[test]
    fn parses_combine_with_each_operator() {
        for (symbol, op) in [
            ('+', CombineOp::Add),
            ('-', CombineOp::Sub),
            ('*', CombineOp::Mul),
            ('/', CombineOp::Div),
        ] {
            let line = format!("z = x {} y", symbol);
            assert_eq!(
                parse(&line).unwrap(),
                Command::Combine {
                    id: "z".to_string(),
                    left: "x".to_string(),
                    right: "y".to_string(),
                    op,
                }
            );
        }
    }

    #[test]
    fn parses_combine_without_spaces() {
        assert_eq!(
            parse("z=x+y").unwrap(),
            Command::Combine {
                id: "z".to_string(),
                left: "x".to_string(),
                right: "y".to_string(),
                op: CombineOp::Add,
            }
        );
    }

    #[test]
    fn parses_increment() {
        assert_eq!(parse("x++").unwrap(), Command::Increment("x".to_string()));
    }

    #[test]
    fn parses_diagnostics() {
        assert_eq!(parse("print x").unwrap(), Command::Print("x".to_string()));
        assert_eq!(
            parse("graph x").unwrap(),
            Command::PrintGraph("x".to_string())
        );
    }

    #[test]
    fn parses_block_and_unblock() {
        assert_eq!(
            parse("block x").unwrap(),
            Command::Block {
                id: "x".to_string(),
                blocked: true
            }
        );
        assert_eq!(
            parse("unblock x").unwrap(),
            Command::Block {
                id: "x".to_string(),
                blocked: false
            }
        );
    }

    #[test]
    fn parses_glitch_toggle() {
        assert_eq!(
            parse("glitches z off").unwrap(),
            Command::Glitches {
                id: "z".to_string(),
                enabled: false
            }
        );
        assert_eq!(
            parse("glitches z on").unwrap(),
            Command::Glitches {
                id: "z".to_string(),
                enabled: true
            }
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse("make me a signal"),
            Err(ParseError::Unrecognized(_))
        ));
        assert!(matches!(parse("5 = x"), Err(ParseError::Unrecognized(_))));
        assert!(matches!(
            parse("x = 99999999999999999999"),
            Err(ParseError::BadInteger(_))
        ));
    }
}
