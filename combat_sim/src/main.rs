//! combat_sim - Run a scripted duel from a TOML scenario and report what happened

use clap::{Arg, Command};
use combat_sim::{run_duel, Scenario};
use log::{error, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let command = Command::new("combat_sim")
        .about("Headless duel simulator for combat_core")
        .arg(
            Arg::new("scenario")
                .help("Path to the scenario TOML file")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("RNG seed, defaults to the scenario's seed")
                .takes_value(true),
        )
        .arg(
            Arg::new("ticks")
                .long("ticks")
                .help("Maximum number of ticks, defaults to the scenario's max_ticks")
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every hit and status event"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full duel report as JSON"),
        );
    let matches = command.get_matches();

    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("Warning: logger already initialised");
    }

    let scenario_path = Path::new(matches.value_of("scenario").unwrap_or_default());
    let scenario = match Scenario::load(scenario_path) {
        Ok(scenario) => scenario,
        Err(err) => {
            error!("Failed to load {}: {}", scenario_path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let seed = match matches.value_of("seed").map(str::parse::<u64>) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            error!("Invalid --seed: {}", err);
            return ExitCode::FAILURE;
        }
        None => scenario.seed,
    };
    let max_ticks = match matches.value_of("ticks").map(str::parse::<u32>) {
        Some(Ok(ticks)) => ticks,
        Some(Err(err)) => {
            error!("Invalid --ticks: {}", err);
            return ExitCode::FAILURE;
        }
        None => scenario.max_ticks,
    };

    let report = match run_duel(&scenario, seed, max_ticks) {
        Ok(report) => report,
        Err(err) => {
            error!("Duel failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if matches.is_present("json") {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                error!("Failed to serialize report: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for hit in &report.hits {
            println!(
                "[{:6.2}s] {} -> {}: {}",
                hit.time,
                hit.dealer,
                hit.receiver,
                hit.result.summary()
            );
        }
        for combatant in &report.combatants {
            let state = if combatant.alive { "alive" } else { "dead" };
            println!("{}: {:.0} health ({})", combatant.id, combatant.health, state);
        }
        println!("{}", report.summary());
    }

    ExitCode::SUCCESS
}
