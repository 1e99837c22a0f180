use crate::core::components::module::ModuleKind;
use crate::core::components::registry::ModuleRegistry;
use crate::core::connections::graph::NetworkGraph;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::execution::pulse_scheduler::PulseScheduler;
use crate::core::types::{ModuleId, Pulse, PulseEvent};
use log::{debug, info, warn};

/// Modules period detection watches, resolved from a sink name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub sink: ModuleId,
    /// The single conjunction feeding the sink
    pub feeder: ModuleId,
    /// Conjunctions feeding `feeder`, in declaration order
    pub watched: Vec<ModuleId>,
}

/// First press index per watched module, and their least common multiple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodReport {
    pub first_presses: Vec<(String, u64)>,
    pub period: u64,
    /// Presses simulated before detection finished
    pub presses_run: u64,
}

impl PeriodReport {
    /// Every watched module fired on the very first press. On counter
    /// networks this usually means the watched polarity is the inverse of
    /// the one that marks a completed cycle.
    pub fn all_fire_on_first_press(&self) -> bool {
        self.first_presses.iter().all(|(_, press)| *press == 1)
    }
}

/// Least common multiple of every first press index, or `PeriodOverflow`
/// when it does not fit in a `u64`
pub fn combine_periods(first_presses: &[(String, u64)]) -> SimResult<u64> {
    let mut period: u64 = 1;
    for (name, at) in first_presses {
        if *at == 0 {
            return Err(SimulationError::PreconditionViolated(format!(
                "'{}' has no first press",
                name
            )));
        }
        let step = period / num_integer::gcd(period, *at);
        period = step
            .checked_mul(*at)
            .ok_or_else(|| SimulationError::PeriodOverflow {
                modules: first_presses.iter().map(|(name, _)| name.clone()).collect(),
            })?;
    }
    Ok(period)
}

/// Finds the press at which every watched conjunction fires together
///
/// Each watched module is assumed to fire for the first time exactly at the
/// end of its period, with all periods starting in phase at press 1. This
/// holds for counter-shaped networks only. Turning on verification checks
/// the second firing of every module lands at twice the first and reports a
/// precondition violation otherwise.
pub struct PeriodDetector {
    scheduler: PulseScheduler,
    watch_pulse: Pulse,
    max_presses: u64,
    verify: bool,
}

impl PeriodDetector {
    /// Detector that watches for low pulses and gives up after `max_presses`
    pub fn new(max_presses: u64) -> Self {
        Self {
            scheduler: PulseScheduler::new(),
            watch_pulse: Pulse::Low,
            max_presses,
            verify: false,
        }
    }

    /// Polarity a watched module must emit to be recorded
    pub fn with_watch_pulse(mut self, pulse: Pulse) -> Self {
        self.watch_pulse = pulse;
        self
    }

    /// Limit the pulses each press may process
    pub fn with_pulse_limit(mut self, max_pulses: usize) -> Self {
        self.scheduler = self.scheduler.with_pulse_limit(max_pulses);
        self
    }

    /// Check second firings before trusting the first ones
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Resolve the sink and check the network has the shape detection needs
    pub fn locate(
        registry: &ModuleRegistry,
        graph: &NetworkGraph,
        sink_name: &str,
    ) -> SimResult<WatchTarget> {
        let sink = registry.require(sink_name)?;
        if registry.kind(sink) != Some(ModuleKind::Sink) {
            return Err(SimulationError::PreconditionViolated(format!(
                "'{}' is not a sink",
                sink_name
            )));
        }

        let feeder = match graph.predecessors(sink) {
            [only] => *only,
            others => {
                return Err(SimulationError::PreconditionViolated(format!(
                    "sink '{}' has {} predecessors, expected exactly one",
                    sink_name,
                    others.len()
                )))
            }
        };
        if registry.kind(feeder) != Some(ModuleKind::Conjunction) {
            return Err(SimulationError::PreconditionViolated(format!(
                "'{}' feeding sink '{}' is not a conjunction",
                registry.name(feeder),
                sink_name
            )));
        }

        let watched = graph.predecessors(feeder).to_vec();
        if watched.is_empty() {
            return Err(SimulationError::PreconditionViolated(format!(
                "conjunction '{}' has no inputs to watch",
                registry.name(feeder)
            )));
        }
        if let Some(&other) = watched
            .iter()
            .find(|&&id| registry.kind(id) != Some(ModuleKind::Conjunction))
        {
            return Err(SimulationError::PreconditionViolated(format!(
                "watched module '{}' is not a conjunction",
                registry.name(other)
            )));
        }

        Ok(WatchTarget {
            sink,
            feeder,
            watched,
        })
    }

    /// Press until every watched module has fired, then combine the press
    /// indices by least common multiple
    pub fn detect(
        &mut self,
        registry: &mut ModuleRegistry,
        graph: &NetworkGraph,
        sink_name: &str,
    ) -> SimResult<PeriodReport> {
        let target = Self::locate(registry, graph, sink_name)?;
        let watched = &target.watched;
        let watch_pulse = self.watch_pulse;

        let mut first: Vec<Option<u64>> = vec![None; watched.len()];
        let mut second: Vec<Option<u64>> = vec![None; watched.len()];
        let mut press: u64 = 0;

        while !self.resolved(&first, &second) {
            if press >= self.max_presses {
                let pending = if self.verify { &second } else { &first };
                let unresolved = watched
                    .iter()
                    .zip(pending.iter())
                    .filter(|(_, found)| found.is_none())
                    .map(|(&id, _)| registry.name(id).to_string())
                    .collect();
                return Err(SimulationError::NonTermination {
                    presses: press,
                    unresolved,
                });
            }
            press += 1;

            let mut fired: Vec<usize> = Vec::new();
            self.scheduler
                .press_with(registry, graph, &mut |event: &PulseEvent| {
                    if event.pulse != watch_pulse {
                        return;
                    }
                    if let Some(slot) = watched.iter().position(|&id| id == event.sender) {
                        if !fired.contains(&slot) {
                            fired.push(slot);
                        }
                    }
                })?;

            for slot in fired {
                match (first[slot], second[slot]) {
                    (None, _) => {
                        first[slot] = Some(press);
                        info!(
                            "'{}' first emitted {} on press {}",
                            registry.name(watched[slot]),
                            watch_pulse,
                            press
                        );
                    }
                    (Some(_), None) => second[slot] = Some(press),
                    (Some(_), Some(_)) => {}
                }
            }
        }

        let mut first_presses = Vec::with_capacity(watched.len());
        for (slot, &id) in watched.iter().enumerate() {
            let name = registry.name(id).to_string();
            let at = first[slot].unwrap_or_default();
            if self.verify {
                let again = second[slot].unwrap_or_default();
                if again != 2 * at {
                    return Err(SimulationError::PreconditionViolated(format!(
                        "'{}' fired on presses {} and {}, not periodic from press 1",
                        name, at, again
                    )));
                }
            }
            first_presses.push((name, at));
        }

        let period = combine_periods(&first_presses)?;
        if period == 1 {
            warn!(
                "Every module watched through '{}' emits {} on the first press",
                sink_name, watch_pulse
            );
        }
        debug!("Period detection resolved after {} presses", press);
        info!("Watched modules of '{}' coincide on press {}", sink_name, period);

        Ok(PeriodReport {
            first_presses,
            period,
            presses_run: press,
        })
    }

    fn resolved(&self, first: &[Option<u64>], second: &[Option<u64>]) -> bool {
        let pending = if self.verify { second } else { first };
        pending.iter().all(Option::is_some)
    }
}

/// Detect the first press on which every module watched through `sink_name`
/// fires a low pulse, pressing at most `max_presses` times
pub fn detect_period(
    registry: &mut ModuleRegistry,
    graph: &NetworkGraph,
    sink_name: &str,
    max_presses: u64,
) -> SimResult<u64> {
    PeriodDetector::new(max_presses)
        .detect(registry, graph, sink_name)
        .map(|report| report.period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::network_builder::NetworkBuilder;
    use crate::core::parser::parse_network;

    // `h` fires low every third press and `g` every fourth; both feed `f`
    const TWO_COUNTERS: &str = "\
broadcaster -> b0, c0
%b0 -> b1, h
%b1 -> h
&h -> b0, f
%c0 -> c1
%c1 -> c2
%c2 -> g
&g -> c2, f
&f -> rx
";

    fn build(description: &str) -> (ModuleRegistry, NetworkGraph) {
        let specs = parse_network(description).unwrap();
        NetworkBuilder::new().add_modules(specs).build().unwrap()
    }

    #[test]
    fn test_locate_watch_target() {
        let (registry, graph) = build(TWO_COUNTERS);
        let target = PeriodDetector::locate(&registry, &graph, "rx").unwrap();
        assert_eq!(target.feeder, registry.id_of("f").unwrap());
        assert_eq!(
            target.watched,
            vec![registry.id_of("h").unwrap(), registry.id_of("g").unwrap()]
        );
    }

    #[test]
    fn test_lcm_of_three_and_four() {
        let (mut registry, graph) = build(TWO_COUNTERS);
        let report = PeriodDetector::new(1_000)
            .detect(&mut registry, &graph, "rx")
            .unwrap();

        assert_eq!(
            report.first_presses,
            vec![("h".to_string(), 3), ("g".to_string(), 4)]
        );
        assert_eq!(report.period, 12);
        assert_eq!(report.presses_run, 4);
    }

    #[test]
    fn test_verification_accepts_in_phase_counters() {
        let (mut registry, graph) = build(TWO_COUNTERS);
        let report = PeriodDetector::new(1_000)
            .with_verification(true)
            .detect(&mut registry, &graph, "rx")
            .unwrap();
        assert_eq!(report.period, 12);
        assert_eq!(report.presses_run, 8);
    }

    #[test]
    fn test_verification_rejects_out_of_phase_module() {
        // Without a reset edge `g` fires on presses 4 and 12
        let (mut registry, graph) = build(
            "broadcaster -> c0\n%c0 -> c1\n%c1 -> c2\n%c2 -> g\n&g -> f\n&f -> rx\n",
        );
        let result = PeriodDetector::new(1_000)
            .with_verification(true)
            .detect(&mut registry, &graph, "rx");
        assert!(matches!(result, Err(SimulationError::PreconditionViolated(_))));
    }

    #[test]
    fn test_budget_exhaustion() {
        let (mut registry, graph) = build(TWO_COUNTERS);
        let result = detect_period(&mut registry, &graph, "rx", 3);
        assert_eq!(
            result,
            Err(SimulationError::NonTermination {
                presses: 3,
                unresolved: vec!["g".to_string()],
            })
        );
    }

    #[test]
    fn test_sink_with_two_predecessors() {
        let (mut registry, graph) =
            build("broadcaster -> a, b\n&a -> rx\n&b -> rx\n");
        let result = detect_period(&mut registry, &graph, "rx", 10);
        assert!(matches!(result, Err(SimulationError::PreconditionViolated(_))));
    }

    #[test]
    fn test_watched_module_must_be_conjunction() {
        let (mut registry, graph) = build("broadcaster -> a\n%a -> f\n&f -> rx\n");
        let result = detect_period(&mut registry, &graph, "rx", 10);
        assert_eq!(
            result,
            Err(SimulationError::PreconditionViolated(
                "watched module 'a' is not a conjunction".to_string()
            ))
        );
    }

    #[test]
    fn test_feeder_must_be_conjunction() {
        let (mut registry, graph) = build("broadcaster -> a\n&a -> f\n%f -> rx\n");
        let result = detect_period(&mut registry, &graph, "rx", 10);
        assert!(matches!(result, Err(SimulationError::PreconditionViolated(_))));
    }

    #[test]
    fn test_unknown_sink() {
        let (mut registry, graph) = build("broadcaster -> a\n&a -> out\n");
        let result = detect_period(&mut registry, &graph, "rx", 10);
        assert_eq!(result, Err(SimulationError::UnknownModule("rx".to_string())));
    }

    fn named(presses: &[u64]) -> Vec<(String, u64)> {
        presses
            .iter()
            .enumerate()
            .map(|(i, &press)| (format!("m{}", i), press))
            .collect()
    }

    #[test]
    fn test_combine_periods() {
        assert_eq!(combine_periods(&named(&[3, 4])), Ok(12));
        assert_eq!(combine_periods(&named(&[4, 6, 8])), Ok(24));
        assert_eq!(combine_periods(&named(&[])), Ok(1));
        assert_eq!(
            combine_periods(&named(&[999_983, 1_000_003])),
            Ok(999_983 * 1_000_003)
        );
        assert!(matches!(
            combine_periods(&named(&[3, 0])),
            Err(SimulationError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn test_combined_period_overflow_is_reported() {
        // Reset points of 13, 14, 15, 17 and 19 bit counters are pairwise
        // coprime, so their product (about 2^78) is the period
        let presses = named(&[8191, 16383, 32767, 131071, 524287]);
        assert_eq!(
            combine_periods(&presses),
            Err(SimulationError::PeriodOverflow {
                modules: vec![
                    "m0".to_string(),
                    "m1".to_string(),
                    "m2".to_string(),
                    "m3".to_string(),
                    "m4".to_string(),
                ],
            })
        );
        // Shared factors keep a large set in range
        assert_eq!(
            combine_periods(&named(&[524287, 524287 * 2, 524287 * 4])),
            Ok(524287 * 4)
        );
    }

    #[test]
    fn test_inverted_polarity_fires_on_first_press() {
        // `h` emits high as soon as `b0` turns on
        let (mut registry, graph) = build(TWO_COUNTERS);
        let report = PeriodDetector::new(100)
            .with_watch_pulse(Pulse::High)
            .detect(&mut registry, &graph, "rx")
            .unwrap();
        assert_eq!(report.first_presses[0], ("h".to_string(), 1));

        let (mut registry, graph) = build(TWO_COUNTERS);
        let report = PeriodDetector::new(100)
            .detect(&mut registry, &graph, "rx")
            .unwrap();
        assert!(!report.all_fire_on_first_press());
    }

    #[test]
    fn test_all_fire_on_first_press() {
        let report = PeriodReport {
            first_presses: named(&[1, 1]),
            period: 1,
            presses_run: 1,
        };
        assert!(report.all_fire_on_first_press());
    }

    #[test]
    fn test_runaway_press_stops_detection() {
        let (mut registry, graph) = build("broadcaster -> a\n&a -> a, f\n&f -> rx\n");
        let result = PeriodDetector::new(5)
            .with_pulse_limit(1_000)
            .detect(&mut registry, &graph, "rx");
        assert_eq!(result, Err(SimulationError::UnsettledPress { pulses: 1_000 }));
    }
}
