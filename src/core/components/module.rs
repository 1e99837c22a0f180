use crate::core::types::{ModuleId, Pulse};
use serde::{Deserialize, Serialize};

/// Declared type of a module, as read from the network description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Forwards every pulse unchanged to all destinations
    Broadcaster,
    /// `%name`: toggles on low pulses, ignores high ones
    FlipFlop,
    /// `&name`: remembers the last pulse from each input, emits their NAND
    Conjunction,
    /// A destination-only module that consumes pulses
    Sink,
}

impl ModuleKind {
    /// Prefix character used in the text description, if any
    pub fn prefix(&self) -> Option<char> {
        match self {
            ModuleKind::FlipFlop => Some('%'),
            ModuleKind::Conjunction => Some('&'),
            ModuleKind::Broadcaster | ModuleKind::Sink => None,
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModuleKind::Broadcaster => "broadcaster",
            ModuleKind::FlipFlop => "flip-flop",
            ModuleKind::Conjunction => "conjunction",
            ModuleKind::Sink => "sink",
        };
        write!(f, "{}", name)
    }
}

/// Last pulse remembered by a conjunction for one of its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMemory {
    pub sender: ModuleId,
    pub last: Pulse,
}

/// Runtime state of one module together with its transition rule
///
/// The variant set is closed: every module type the network supports is
/// handled by the single exhaustive match in [`ModuleState::receive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleState {
    Broadcaster,
    FlipFlop { on: bool },
    Conjunction { inputs: Vec<InputMemory> },
    Sink,
}

impl ModuleState {
    /// Fresh state for a module of the given kind.
    ///
    /// `inputs` is only used for conjunctions, whose memory starts at low for
    /// every input.
    pub fn initial(kind: ModuleKind, inputs: &[ModuleId]) -> Self {
        match kind {
            ModuleKind::Broadcaster => ModuleState::Broadcaster,
            ModuleKind::FlipFlop => ModuleState::FlipFlop { on: false },
            ModuleKind::Conjunction => ModuleState::Conjunction {
                inputs: inputs
                    .iter()
                    .map(|&sender| InputMemory {
                        sender,
                        last: Pulse::Low,
                    })
                    .collect(),
            },
            ModuleKind::Sink => ModuleState::Sink,
        }
    }

    /// Kind this state belongs to
    pub fn kind(&self) -> ModuleKind {
        match self {
            ModuleState::Broadcaster => ModuleKind::Broadcaster,
            ModuleState::FlipFlop { .. } => ModuleKind::FlipFlop,
            ModuleState::Conjunction { .. } => ModuleKind::Conjunction,
            ModuleState::Sink => ModuleKind::Sink,
        }
    }

    /// Apply one incoming pulse and return the pulse to send to every
    /// destination, or `None` when the module stays silent.
    pub fn receive(&mut self, sender: ModuleId, pulse: Pulse) -> Option<Pulse> {
        match self {
            ModuleState::Broadcaster => Some(pulse),
            ModuleState::FlipFlop { on } => match pulse {
                Pulse::High => None,
                Pulse::Low => {
                    *on = !*on;
                    Some(Pulse::from(*on))
                }
            },
            ModuleState::Conjunction { inputs } => {
                // Unknown senders are rejected by the scheduler before this point
                if let Some(memory) = inputs.iter_mut().find(|m| m.sender == sender) {
                    memory.last = pulse;
                }
                let all_high = inputs.iter().all(|m| m.last.is_high());
                Some(Pulse::from(!all_high))
            }
            ModuleState::Sink => None,
        }
    }

    /// Whether a pulse from `sender` can be applied. Only conjunctions are
    /// picky: they must hold a memory slot for the sender.
    pub fn accepts(&self, sender: ModuleId) -> bool {
        match self {
            ModuleState::Conjunction { inputs } => inputs.iter().any(|m| m.sender == sender),
            _ => true,
        }
    }

    /// Whether the module is back at the state it was built with
    pub fn is_initial(&self) -> bool {
        match self {
            ModuleState::FlipFlop { on } => !on,
            ModuleState::Conjunction { inputs } => inputs.iter().all(|m| m.last.is_low()),
            ModuleState::Broadcaster | ModuleState::Sink => true,
        }
    }

    /// Put the module back into its initial state
    pub fn reset(&mut self) {
        match self {
            ModuleState::FlipFlop { on } => *on = false,
            ModuleState::Conjunction { inputs } => {
                for memory in inputs.iter_mut() {
                    memory.last = Pulse::Low;
                }
            }
            ModuleState::Broadcaster | ModuleState::Sink => {}
        }
    }

    /// Senders a conjunction remembers, in build order. Empty for other kinds.
    pub fn input_senders(&self) -> Vec<ModuleId> {
        match self {
            ModuleState::Conjunction { inputs } => inputs.iter().map(|m| m.sender).collect(),
            _ => Vec::new(),
        }
    }
}
