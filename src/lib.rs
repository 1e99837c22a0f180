pub mod core;

// Re-export commonly used types
pub use crate::core::builder::network_builder::{ModuleSpec, NetworkBuilder};
pub use crate::core::components::module::{ModuleKind, ModuleState};
pub use crate::core::components::registry::ModuleRegistry;
pub use crate::core::connections::graph::NetworkGraph;
pub use crate::core::errors::{SimResult, SimulationError};
pub use crate::core::execution::aggregator::aggregate;
pub use crate::core::execution::config::SimulationConfig;
pub use crate::core::execution::period_detector::{combine_periods, detect_period, PeriodReport};
pub use crate::core::execution::pulse_scheduler::{PressTrace, PulseCounts, PulseScheduler};
pub use crate::core::execution::simulation_engine::PulseSimulation;
pub use crate::core::parser::parse_network;
pub use crate::core::types::{ModuleId, Pulse, PulseEvent};
