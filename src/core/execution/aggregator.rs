use crate::core::components::registry::ModuleRegistry;
use crate::core::connections::graph::NetworkGraph;
use crate::core::errors::SimResult;
use crate::core::execution::pulse_scheduler::{PulseCounts, PulseScheduler};
use log::debug;

/// Sums low and high pulses over a run of presses
///
/// State carries over from press to press; nothing is reset in between.
pub struct Aggregator {
    scheduler: PulseScheduler,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            scheduler: PulseScheduler::new(),
        }
    }

    /// Limit the pulses each press may process
    pub fn with_pulse_limit(mut self, max_pulses: usize) -> Self {
        self.scheduler = self.scheduler.with_pulse_limit(max_pulses);
        self
    }

    /// Run `presses` presses and return the summed counts, the injected
    /// button pulse of every press included
    pub fn run(
        &mut self,
        registry: &mut ModuleRegistry,
        graph: &NetworkGraph,
        presses: u64,
    ) -> SimResult<PulseCounts> {
        let mut totals = PulseCounts::default();

        for press in 1..=presses {
            let mut counts = PulseCounts::default();
            self.scheduler.press_with(registry, graph, &mut counts)?;
            debug!(
                "Press {}: {} low, {} high",
                press, counts.low, counts.high
            );
            totals.merge(counts);
        }

        Ok(totals)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `presses` presses on the given network and return `(low, high)` totals
pub fn aggregate(
    registry: &mut ModuleRegistry,
    graph: &NetworkGraph,
    presses: u64,
) -> SimResult<PulseCounts> {
    Aggregator::new().run(registry, graph, presses)
}
