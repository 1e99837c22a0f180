use crate::core::builder::network_builder::{ModuleSpec, NetworkBuilder};
use crate::core::components::module::ModuleState;
use crate::core::components::registry::ModuleRegistry;
use crate::core::connections::graph::NetworkGraph;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::execution::aggregator::Aggregator;
use crate::core::execution::config::SimulationConfig;
use crate::core::execution::period_detector::{PeriodDetector, PeriodReport};
use crate::core::execution::pulse_scheduler::{PressTrace, PulseCounts, PulseScheduler};
use crate::core::parser::parse_network;
use log::{debug, info};

/// Observer for press-level progress of a simulation
pub trait SimulationObserver {
    /// Called after every press run through [`PulseSimulation::press`]
    fn on_press_complete(&mut self, press: u64, counts: PulseCounts);
}

/// Owns a pulse network and runs queries against it
///
/// The registry is the only mutable part and is touched by one press at a
/// time. `presses_run` counts presses since the last reset.
pub struct PulseSimulation {
    registry: ModuleRegistry,
    graph: NetworkGraph,
    config: SimulationConfig,
    scheduler: PulseScheduler,
    presses_run: u64,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl PulseSimulation {
    /// Build a simulation from decoded module declarations
    pub fn from_specs(specs: Vec<ModuleSpec>, config: SimulationConfig) -> SimResult<Self> {
        let (registry, graph) = NetworkBuilder::new()
            .strict(config.strict_destinations)
            .add_modules(specs)
            .build()?;

        Ok(Self {
            registry,
            graph,
            scheduler: PulseScheduler::new().with_pulse_limit(config.max_pulses_per_press),
            config,
            presses_run: 0,
            observers: Vec::new(),
        })
    }

    /// Build a simulation from the text description format
    pub fn from_description(description: &str, config: SimulationConfig) -> SimResult<Self> {
        Self::from_specs(parse_network(description)?, config)
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Run a single press to quiescence and return its trace
    pub fn press(&mut self) -> SimResult<PressTrace> {
        let trace = self.scheduler.press(&mut self.registry, &self.graph)?;
        self.presses_run += 1;

        let counts = trace.counts();
        debug!(
            "Press {}: {} pulses ({} low, {} high)",
            self.presses_run,
            trace.len(),
            counts.low,
            counts.high
        );
        for observer in &mut self.observers {
            observer.on_press_complete(self.presses_run, counts);
        }

        Ok(trace)
    }

    /// Run the configured number of presses from the current state and sum
    /// the pulse counts
    pub fn aggregate(&mut self) -> SimResult<PulseCounts> {
        let presses = self.config.presses;
        self.aggregate_presses(presses)
    }

    /// Run `presses` presses from the current state and sum the pulse counts
    pub fn aggregate_presses(&mut self, presses: u64) -> SimResult<PulseCounts> {
        let counts = Aggregator::new()
            .with_pulse_limit(self.config.max_pulses_per_press)
            .run(&mut self.registry, &self.graph, presses)?;
        self.presses_run += presses;
        info!(
            "{} presses: {} low, {} high, product {}",
            presses,
            counts.low,
            counts.high,
            counts.product()
        );
        Ok(counts)
    }

    /// Detect the period of the configured sink, starting from the initial
    /// state so press indices count from 1
    pub fn detect_period(&mut self) -> SimResult<u64> {
        self.detect_periods().map(|report| report.period)
    }

    /// Like [`detect_period`](Self::detect_period) but returns every watched
    /// module's first press index as well
    pub fn detect_periods(&mut self) -> SimResult<PeriodReport> {
        self.reset();

        let mut detector = PeriodDetector::new(self.config.max_detection_presses)
            .with_watch_pulse(self.config.watch_pulse)
            .with_verification(self.config.verify_periods)
            .with_pulse_limit(self.config.max_pulses_per_press);
        let result = detector.detect(&mut self.registry, &self.graph, &self.config.sink_name);

        match &result {
            Ok(report) => self.presses_run = report.presses_run,
            Err(SimulationError::NonTermination { presses, .. }) => self.presses_run = *presses,
            Err(_) => {}
        }
        result
    }

    /// Put every module back into its initial state
    pub fn reset(&mut self) {
        self.registry.reset();
        self.presses_run = 0;
    }

    /// Current state of a module by name
    pub fn module_state(&self, name: &str) -> SimResult<&ModuleState> {
        let id = self.registry.require(name)?;
        self.registry
            .state(id)
            .ok_or_else(|| SimulationError::UnknownModule(name.to_string()))
    }

    /// Whether every module is back at its initial state
    pub fn is_initial(&self) -> bool {
        self.registry.is_initial()
    }

    pub fn presses_run(&self) -> u64 {
        self.presses_run
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
