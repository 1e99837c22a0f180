use serde::{Deserialize, Serialize};

/// Stable index of a module inside the registry arena
///
/// Names are resolved to ids once, when the network is built. Every
/// per-press lookup afterwards is a plain vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    /// Create an id from a raw arena index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw arena index
    pub fn index(&self) -> usize {
        self.0
    }

    /// Whether this id stands for the implicit button
    pub fn is_button(&self) -> bool {
        *self == BUTTON
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_button() {
            write!(f, "#button")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// The implicit module that injects the first low pulse of every press.
/// It is never stored in the registry.
pub const BUTTON: ModuleId = ModuleId(usize::MAX);

/// Name the button is reported under in traces
pub const BUTTON_NAME: &str = "button";

/// Binary pulse polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pulse {
    Low,
    High,
}

impl Pulse {
    /// `true` for high, `false` for low
    pub fn is_high(&self) -> bool {
        matches!(self, Pulse::High)
    }

    pub fn is_low(&self) -> bool {
        matches!(self, Pulse::Low)
    }
}

impl From<bool> for Pulse {
    fn from(high: bool) -> Self {
        if high {
            Pulse::High
        } else {
            Pulse::Low
        }
    }
}

impl From<Pulse> for bool {
    fn from(pulse: Pulse) -> Self {
        pulse.is_high()
    }
}

impl std::fmt::Display for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pulse::Low => write!(f, "low"),
            Pulse::High => write!(f, "high"),
        }
    }
}

/// One pulse travelling along an edge
///
/// Lives only inside the scheduler queue of a single press and in the trace
/// handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PulseEvent {
    pub sender: ModuleId,
    pub receiver: ModuleId,
    pub pulse: Pulse,
}

impl PulseEvent {
    pub fn new(sender: ModuleId, receiver: ModuleId, pulse: Pulse) -> Self {
        Self {
            sender,
            receiver,
            pulse,
        }
    }

    /// The event that starts every press: button sends low to the broadcaster
    pub fn button_press(broadcaster: ModuleId) -> Self {
        Self::new(BUTTON, broadcaster, Pulse::Low)
    }
}
