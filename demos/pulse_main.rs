use pulsenet::{Pulse, PulseSimulation, SimulationConfig};
use std::env;
use std::fs;

fn usage() -> String {
    "usage: pulse_main <network-file> [sink-name] [low|high]".to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp(None)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let path = args.first().ok_or_else(usage)?;

    let mut config = SimulationConfig::default();
    if let Some(sink) = args.get(1) {
        config = config.with_sink_name(sink);
    }
    if let Some(polarity) = args.get(2) {
        let pulse = match polarity.as_str() {
            "low" => Pulse::Low,
            "high" => Pulse::High,
            other => return Err(format!("unknown polarity '{}'; {}", other, usage()).into()),
        };
        config = config.with_watch_pulse(pulse);
    }

    let description = fs::read_to_string(path)?;
    let mut sim = PulseSimulation::from_description(&description, config)?;

    let counts = sim.aggregate()?;
    println!(
        "Pulses after {} presses: {} low, {} high",
        sim.config().presses,
        counts.low,
        counts.high
    );
    println!("Pulse product: {}", counts.product());

    match sim.detect_periods() {
        Ok(report) => {
            for (name, press) in &report.first_presses {
                println!("  {} fires on press {}", name, press);
            }
            println!("Period: {}", report.period);
            if report.all_fire_on_first_press() {
                let other = match sim.config().watch_pulse {
                    Pulse::Low => "high",
                    Pulse::High => "low",
                };
                eprintln!(
                    "hint: every watched module fired on press 1; try watching {} pulses",
                    other
                );
            }
        }
        Err(err) => println!("Period unavailable: {}", err),
    }

    Ok(())
}
