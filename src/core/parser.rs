//! Decoder for the line-oriented network description
//!
//! ```text
//! broadcaster -> a, b
//! %a -> b
//! &inv -> a
//! ```
//!
//! `%` marks a flip-flop and `&` a conjunction. A bare name declares a
//! broadcaster-style forwarder; more than one of those is rejected when the
//! network is built.

use crate::core::builder::network_builder::ModuleSpec;
use crate::core::components::module::ModuleKind;
use crate::core::errors::{SimResult, SimulationError};

/// Parse a whole description. Blank lines are skipped.
pub fn parse_network(input: &str) -> SimResult<Vec<ModuleSpec>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

/// Parse one `source -> dest, dest` line. `line_number` is 1-based.
pub fn parse_line(line_number: usize, line: &str) -> SimResult<ModuleSpec> {
    let error = |message: &str| SimulationError::ParseError {
        line: line_number,
        message: message.to_string(),
    };

    let (source, targets) = line.split_once("->").ok_or_else(|| error("missing '->'"))?;
    let source = source.trim();

    let (kind, name) = match source.chars().next() {
        Some('%') => (ModuleKind::FlipFlop, &source[1..]),
        Some('&') => (ModuleKind::Conjunction, &source[1..]),
        _ => (ModuleKind::Broadcaster, source),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(error("empty module name"));
    }

    let mut destinations = Vec::new();
    for target in targets.split(',') {
        let target = target.trim();
        if target.is_empty() {
            // "a -> " declares a module with no outputs
            if targets.trim().is_empty() {
                break;
            }
            return Err(error("empty destination name"));
        }
        destinations.push(target.to_string());
    }

    Ok(ModuleSpec {
        name: name.to_string(),
        kind,
        destinations,
    })
}
