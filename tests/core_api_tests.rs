use pulsenet::{
    aggregate, detect_period, parse_network, ModuleKind, ModuleSpec, NetworkBuilder, Pulse,
    PulseCounts, PulseScheduler, PulseSimulation, SimulationConfig, SimulationError,
};

const CHAIN_WITH_INVERTER: &str = "\
broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a
";

const WITH_OUTPUT: &str = "\
broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output
";

/// Two reset counters of length 3 and 4 behind inverters, the shape real
/// inputs use, watched for the inverters' high pulses
const INVERTED_COUNTERS: &str = "\
broadcaster -> b0, c0
%b0 -> b1, h
%b1 -> h
&h -> b0, hi
&hi -> f
%c0 -> c1
%c1 -> c2
%c2 -> g
&g -> c2, gi
&gi -> f
&f -> rx
";

#[test]
fn test_public_aggregate_on_published_examples() {
    let (mut registry, graph) = NetworkBuilder::new()
        .add_modules(parse_network(CHAIN_WITH_INVERTER).unwrap())
        .build()
        .unwrap();
    assert_eq!(
        aggregate(&mut registry, &graph, 1000).unwrap(),
        PulseCounts::new(8000, 4000)
    );

    let mut sim = PulseSimulation::from_description(WITH_OUTPUT, SimulationConfig::default()).unwrap();
    assert_eq!(sim.aggregate().unwrap().product(), 11_687_500);
}

#[test]
fn test_second_output_example_trace() {
    let (mut registry, graph) = NetworkBuilder::new()
        .add_modules(parse_network(WITH_OUTPUT).unwrap())
        .build()
        .unwrap();
    let mut scheduler = PulseScheduler::new();

    let lines: Vec<Vec<String>> = (0..4)
        .map(|_| scheduler.press(&mut registry, &graph).unwrap().describe(&registry))
        .collect();

    assert_eq!(
        lines[0],
        vec![
            "button -low-> broadcaster",
            "broadcaster -low-> a",
            "a -high-> inv",
            "a -high-> con",
            "inv -low-> b",
            "con -high-> output",
            "b -high-> con",
            "con -low-> output",
        ]
    );
    assert_eq!(
        lines[1],
        vec![
            "button -low-> broadcaster",
            "broadcaster -low-> a",
            "a -low-> inv",
            "a -low-> con",
            "inv -high-> b",
            "con -high-> output",
        ]
    );
    assert_eq!(lines[3], lines[1]);
    assert!(registry.is_initial());
}

#[test]
fn test_zero_presses_for_any_network() {
    for description in [CHAIN_WITH_INVERTER, WITH_OUTPUT, INVERTED_COUNTERS] {
        let mut sim = PulseSimulation::from_description(
            description,
            SimulationConfig::new().with_presses(0),
        )
        .unwrap();
        assert_eq!(sim.aggregate().unwrap(), PulseCounts::new(0, 0));
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let run = || {
        let mut sim =
            PulseSimulation::from_description(INVERTED_COUNTERS, SimulationConfig::default())
                .unwrap();
        let traces: Vec<_> = (0..30).map(|_| sim.press().unwrap()).collect();
        (traces, sim.aggregate().unwrap())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_detect_period_on_inverter_shape_watching_high() {
    let config = SimulationConfig::new()
        .with_watch_pulse(Pulse::High)
        .with_verify_periods(true);
    let mut sim = PulseSimulation::from_description(INVERTED_COUNTERS, config).unwrap();

    let report = sim.detect_periods().unwrap();
    assert_eq!(
        report.first_presses,
        vec![("hi".to_string(), 3), ("gi".to_string(), 4)]
    );
    assert_eq!(report.period, 12);
}

#[test]
fn test_detect_period_from_triples() {
    let specs = vec![
        ModuleSpec::new("broadcaster", ModuleKind::Broadcaster, &["b0", "c0"]),
        ModuleSpec::new("b0", ModuleKind::FlipFlop, &["b1", "h"]),
        ModuleSpec::new("b1", ModuleKind::FlipFlop, &["h"]),
        ModuleSpec::new("h", ModuleKind::Conjunction, &["b0", "f"]),
        ModuleSpec::new("c0", ModuleKind::FlipFlop, &["c1"]),
        ModuleSpec::new("c1", ModuleKind::FlipFlop, &["c2"]),
        ModuleSpec::new("c2", ModuleKind::FlipFlop, &["g"]),
        ModuleSpec::new("g", ModuleKind::Conjunction, &["c2", "f"]),
        ModuleSpec::new("f", ModuleKind::Conjunction, &["rx"]),
        ModuleSpec::new("rx", ModuleKind::Sink, &[]),
    ];
    let (mut registry, graph) = NetworkBuilder::new()
        .strict(true)
        .add_modules(specs)
        .build()
        .unwrap();

    assert_eq!(detect_period(&mut registry, &graph, "rx", 100), Ok(12));
}

#[test]
fn test_structural_errors_surface_before_simulation() {
    let fed_broadcaster = "broadcaster -> a\n%a -> broadcaster\n";
    assert_eq!(
        PulseSimulation::from_description(fed_broadcaster, SimulationConfig::default()).err(),
        Some(SimulationError::BroadcasterHasInputs("a".to_string()))
    );

    let two_roots = "broadcaster -> a\nrelay -> a\n%a -> out\n";
    assert_eq!(
        PulseSimulation::from_description(two_roots, SimulationConfig::default()).err(),
        Some(SimulationError::MultipleBroadcasters(vec![
            "broadcaster".to_string(),
            "relay".to_string()
        ]))
    );
}

#[test]
fn test_detection_on_aggregate_example_is_rejected() {
    // `output` is fed by `con`, whose inputs include the flip-flop `b`
    let config = SimulationConfig::new().with_sink_name("output");
    let mut sim = PulseSimulation::from_description(WITH_OUTPUT, config).unwrap();
    assert!(matches!(
        sim.detect_period(),
        Err(SimulationError::PreconditionViolated(_))
    ));
}

#[test]
fn test_inverted_watch_polarity_is_flagged() {
    // `ai` and `bi` invert conjunctions that emit high on every press
    let description = "\
broadcaster -> a, b
&a -> ai
&b -> bi
&ai -> f
&bi -> f
&f -> rx
";
    let mut sim = PulseSimulation::from_description(description, SimulationConfig::default()).unwrap();
    let report = sim.detect_periods().unwrap();
    assert_eq!(report.period, 1);
    assert!(report.all_fire_on_first_press());
}
