/// Errors raised while building or running a pulse network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A description line could not be decoded
    ParseError { line: usize, message: String },
    /// Two declarations share a name
    DuplicateModule(String),
    /// No broadcaster was declared
    MissingBroadcaster,
    /// More than one broadcaster was declared
    MultipleBroadcasters(Vec<String>),
    /// Some module lists the broadcaster as a destination
    BroadcasterHasInputs(String),
    /// A module declared as a sink lists destinations
    SinkHasDestinations(String),
    /// A conjunction's remembered inputs differ from the modules feeding it
    ConjunctionInputMismatch(String),
    /// A destination was never declared (strict mode only)
    DanglingEdge { source: String, destination: String },
    /// Lookup of a name that is not in the network
    UnknownModule(String),
    /// The network does not have the shape period detection relies on
    PreconditionViolated(String),
    /// Period detection ran out of its press budget
    NonTermination { presses: u64, unresolved: Vec<String> },
    /// A single press kept producing pulses past the per-press limit
    UnsettledPress { pulses: usize },
    /// The combined period of the watched modules does not fit in a `u64`
    PeriodOverflow { modules: Vec<String> },
}

impl SimulationError {
    /// Structural errors mean the graph itself is unusable. The rest are
    /// limits hit while running a valid graph.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            SimulationError::NonTermination { .. }
                | SimulationError::UnsettledPress { .. }
                | SimulationError::PeriodOverflow { .. }
        )
    }
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::ParseError { line, message } => {
                write!(f, "Parse error on line {}: {}", line, message)
            }
            SimulationError::DuplicateModule(name) => {
                write!(f, "Module '{}' is declared more than once", name)
            }
            SimulationError::MissingBroadcaster => write!(f, "Network has no broadcaster"),
            SimulationError::MultipleBroadcasters(names) => {
                write!(f, "Network has several broadcasters: {}", names.join(", "))
            }
            SimulationError::BroadcasterHasInputs(source) => {
                write!(f, "Broadcaster must have no inputs, but '{}' feeds it", source)
            }
            SimulationError::SinkHasDestinations(name) => {
                write!(f, "Sink '{}' cannot have destinations", name)
            }
            SimulationError::ConjunctionInputMismatch(msg) => {
                write!(f, "Conjunction input mismatch: {}", msg)
            }
            SimulationError::DanglingEdge { source, destination } => write!(
                f,
                "Module '{}' sends to undeclared module '{}'",
                source, destination
            ),
            SimulationError::UnknownModule(name) => write!(f, "Unknown module: {}", name),
            SimulationError::PreconditionViolated(msg) => {
                write!(f, "Period detection precondition violated: {}", msg)
            }
            SimulationError::NonTermination {
                presses,
                unresolved,
            } => write!(
                f,
                "No period found after {} presses for: {}",
                presses,
                unresolved.join(", ")
            ),
            SimulationError::UnsettledPress { pulses } => {
                write!(f, "Press did not settle within {} pulses", pulses)
            }
            SimulationError::PeriodOverflow { modules } => write!(
                f,
                "Combined period of {} overflows u64",
                modules.join(", ")
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result alias used across the simulator
pub type SimResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimulationError::DanglingEdge {
            source: "a".to_string(),
            destination: "zz".to_string(),
        };
        assert_eq!(err.to_string(), "Module 'a' sends to undeclared module 'zz'");

        let err = SimulationError::NonTermination {
            presses: 10,
            unresolved: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(err.to_string(), "No period found after 10 presses for: x, y");
    }

    #[test]
    fn test_runtime_limits_are_not_structural() {
        assert!(SimulationError::MissingBroadcaster.is_structural());
        assert!(SimulationError::PreconditionViolated("x".into()).is_structural());
        assert!(!SimulationError::NonTermination {
            presses: 1,
            unresolved: vec![]
        }
        .is_structural());
        assert!(!SimulationError::UnsettledPress { pulses: 10 }.is_structural());
        assert!(!SimulationError::PeriodOverflow { modules: vec![] }.is_structural());
    }

    #[test]
    fn test_limit_messages() {
        assert_eq!(
            SimulationError::UnsettledPress { pulses: 500 }.to_string(),
            "Press did not settle within 500 pulses"
        );
        let err = SimulationError::PeriodOverflow {
            modules: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Combined period of a, b overflows u64");
    }
}
