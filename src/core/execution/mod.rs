pub mod aggregator;
pub mod config;
pub mod period_detector;
pub mod pulse_scheduler;
pub mod simulation_engine;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use config::SimulationConfig;
pub use period_detector::PeriodDetector;
pub use pulse_scheduler::PulseScheduler;
pub use simulation_engine::PulseSimulation;
