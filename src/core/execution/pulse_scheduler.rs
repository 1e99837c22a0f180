use crate::core::components::registry::ModuleRegistry;
use crate::core::connections::graph::NetworkGraph;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::execution::config::DEFAULT_MAX_PULSES_PER_PRESS;
use crate::core::types::{Pulse, PulseEvent};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Receives every pulse a press processes, in processing order
pub trait PulseObserver {
    fn on_pulse(&mut self, event: &PulseEvent);
}

impl<F: FnMut(&PulseEvent)> PulseObserver for F {
    fn on_pulse(&mut self, event: &PulseEvent) {
        self(event)
    }
}

/// Low and high pulse totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseCounts {
    pub low: u64,
    pub high: u64,
}

impl PulseCounts {
    pub fn new(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    pub fn record(&mut self, pulse: Pulse) {
        match pulse {
            Pulse::Low => self.low += 1,
            Pulse::High => self.high += 1,
        }
    }

    pub fn merge(&mut self, other: PulseCounts) {
        self.low += other.low;
        self.high += other.high;
    }

    pub fn total(&self) -> u64 {
        self.low + self.high
    }

    /// `low * high`, the throughput statistic
    pub fn product(&self) -> u64 {
        self.low * self.high
    }
}

impl PulseObserver for PulseCounts {
    fn on_pulse(&mut self, event: &PulseEvent) {
        self.record(event.pulse);
    }
}

/// Every pulse processed by one press, in the order it was applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressTrace {
    events: Vec<PulseEvent>,
}

impl PressTrace {
    pub fn events(&self) -> &[PulseEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn counts(&self) -> PulseCounts {
        let mut counts = PulseCounts::default();
        for event in &self.events {
            counts.record(event.pulse);
        }
        counts
    }

    pub fn low_count(&self) -> u64 {
        self.counts().low
    }

    pub fn high_count(&self) -> u64 {
        self.counts().high
    }

    /// Render as `sender -pulse-> receiver` lines
    pub fn describe(&self, registry: &ModuleRegistry) -> Vec<String> {
        self.events
            .iter()
            .map(|event| {
                format!(
                    "{} -{}-> {}",
                    registry.name(event.sender),
                    event.pulse,
                    registry.name(event.receiver)
                )
            })
            .collect()
    }
}

impl PulseObserver for PressTrace {
    fn on_pulse(&mut self, event: &PulseEvent) {
        self.events.push(*event);
    }
}

/// FIFO pulse queue that runs one press to quiescence
///
/// Pulses are processed strictly breadth-first: a module's outputs are
/// appended behind everything already pending, so a conjunction sees all of
/// its earlier inputs of the same press before later modules consume it.
///
/// A press that is still producing pulses after `max_pulses` is abandoned
/// with [`SimulationError::UnsettledPress`]; module state is then left as it
/// was at that point.
#[derive(Debug)]
pub struct PulseScheduler {
    queue: VecDeque<PulseEvent>,
    max_pulses: usize,
}

impl Default for PulseScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseScheduler {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            max_pulses: DEFAULT_MAX_PULSES_PER_PRESS,
        }
    }

    /// Limit the pulses one press may process
    pub fn with_pulse_limit(mut self, max_pulses: usize) -> Self {
        self.max_pulses = max_pulses;
        self
    }

    pub fn pulse_limit(&self) -> usize {
        self.max_pulses
    }

    /// Run one press and return its full trace
    pub fn press(&mut self, registry: &mut ModuleRegistry, graph: &NetworkGraph) -> SimResult<PressTrace> {
        let mut trace = PressTrace::default();
        self.press_with(registry, graph, &mut trace)?;
        Ok(trace)
    }

    /// Run one press, handing each processed pulse to `observer`.
    /// Returns the number of pulses processed.
    pub fn press_with<O: PulseObserver + ?Sized>(
        &mut self,
        registry: &mut ModuleRegistry,
        graph: &NetworkGraph,
        observer: &mut O,
    ) -> SimResult<usize> {
        let broadcaster = graph.broadcaster().ok_or(SimulationError::MissingBroadcaster)?;

        self.queue.clear();
        self.queue.push_back(PulseEvent::button_press(broadcaster));
        let mut processed = 0;

        while let Some(event) = self.queue.pop_front() {
            if processed >= self.max_pulses {
                self.queue.clear();
                return Err(SimulationError::UnsettledPress { pulses: processed });
            }
            trace!(
                "{} -{}-> {}",
                registry.name(event.sender),
                event.pulse,
                registry.name(event.receiver)
            );
            observer.on_pulse(&event);
            processed += 1;

            let accepts = registry
                .state(event.receiver)
                .map(|state| state.accepts(event.sender))
                .ok_or_else(|| SimulationError::UnknownModule(event.receiver.to_string()))?;
            if !accepts {
                self.queue.clear();
                return Err(SimulationError::ConjunctionInputMismatch(format!(
                    "'{}' has no memory for input '{}'",
                    registry.name(event.receiver),
                    registry.name(event.sender)
                )));
            }

            let state = registry
                .state_mut(event.receiver)
                .ok_or_else(|| SimulationError::UnknownModule(event.receiver.to_string()))?;

            if let Some(output) = state.receive(event.sender, event.pulse) {
                for &destination in graph.destinations(event.receiver) {
                    self.queue
                        .push_back(PulseEvent::new(event.receiver, destination, output));
                }
            }
        }

        Ok(processed)
    }

    /// Pulses still queued; always zero between presses
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
