//! Configuration for pulse network simulation
//!
//! Controls how many presses the aggregate statistic runs for, how far period
//! detection may go before giving up, and how the network is built.

use crate::core::types::Pulse;
use serde::{Deserialize, Serialize};

/// Presses used by the aggregate pulse-count statistic
pub const DEFAULT_PRESSES: u64 = 1000;

/// Press budget for period detection
pub const DEFAULT_MAX_DETECTION_PRESSES: u64 = 100_000_000;

/// Pulses a single press may process before it is treated as runaway
pub const DEFAULT_MAX_PULSES_PER_PRESS: usize = 1_000_000;

/// Sink period detection targets unless told otherwise
pub const DEFAULT_SINK_NAME: &str = "rx";

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of presses the aggregator runs
    pub presses: u64,
    /// Upper bound on presses during period detection
    pub max_detection_presses: u64,
    /// Upper bound on pulses processed within one press
    pub max_pulses_per_press: usize,
    /// Reject destinations that are never declared instead of making them sinks
    pub strict_destinations: bool,
    /// Sink whose feeding conjunction's inputs are watched
    pub sink_name: String,
    /// Polarity a watched module must emit to be recorded
    pub watch_pulse: Pulse,
    /// Keep pressing after detection until every watched module fires a second
    /// time, and fail if that is not at twice its first press index
    pub verify_periods: bool,
}

impl SimulationConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            presses: DEFAULT_PRESSES,
            max_detection_presses: DEFAULT_MAX_DETECTION_PRESSES,
            max_pulses_per_press: DEFAULT_MAX_PULSES_PER_PRESS,
            strict_destinations: false,
            sink_name: DEFAULT_SINK_NAME.to_string(),
            watch_pulse: Pulse::Low,
            verify_periods: false,
        }
    }

    /// Set the number of presses for the aggregate statistic
    pub fn with_presses(mut self, presses: u64) -> Self {
        self.presses = presses;
        self
    }

    /// Set the press budget for period detection
    pub fn with_max_detection_presses(mut self, max: u64) -> Self {
        self.max_detection_presses = max;
        self
    }

    /// Set how many pulses one press may process
    pub fn with_max_pulses_per_press(mut self, max: usize) -> Self {
        self.max_pulses_per_press = max;
        self
    }

    /// Turn strict destination checking on or off
    pub fn with_strict_destinations(mut self, strict: bool) -> Self {
        self.strict_destinations = strict;
        self
    }

    /// Set the sink targeted by period detection
    pub fn with_sink_name(mut self, name: &str) -> Self {
        self.sink_name = name.to_string();
        self
    }

    /// Set the polarity watched modules are recorded on
    pub fn with_watch_pulse(mut self, pulse: Pulse) -> Self {
        self.watch_pulse = pulse;
        self
    }

    /// Turn second-occurrence verification on or off
    pub fn with_verify_periods(mut self, verify: bool) -> Self {
        self.verify_periods = verify;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
