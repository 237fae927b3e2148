//! Tomasulo pipeline simulator CLI.
//!
//! This binary runs an assembly program through the cycle engine and reports
//! what happened. It performs:
//! 1. **Setup:** Load the source file, optional JSON configuration, and
//!    `NAME=VALUE` register seeds.
//! 2. **Run:** Step to completion or to the cycle cap.
//! 3. **Report:** Per-instruction timing table, event log, statistics, and
//!    optionally the full final state as JSON.
//!
//! Set `RUST_LOG=debug` (or `trace`) to watch the engine's per-cycle
//! diagnostics on stderr.

use clap::Parser;
use std::{fs, process};
use tomsim_core::machine::{DynInst, MachineState};
use tomsim_core::{Config, RunOutcome, Simulator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tomsim",
    version,
    about = "Cycle-accurate Tomasulo pipeline simulator",
    long_about = "Run a MIPS/DLX-like assembly program through a classical Tomasulo\n\
                  out-of-order pipeline and print the per-instruction timing table.\n\n\
                  Examples:\n  \
                  tomsim loop.asm --reg R1=0 --reg F2=1.33\n  \
                  tomsim prog.asm --config machine.json --json"
)]
struct Cli {
    /// Assembly source file to simulate.
    file: String,

    /// Machine configuration as JSON (defaults used when absent).
    #[arg(short, long)]
    config: Option<String>,

    /// Seed a starting register value, e.g. `--reg F2=1.33`. Repeatable.
    #[arg(short, long = "reg", value_name = "NAME=VALUE")]
    registers: Vec<String>,

    /// Stop after this many cycles even if the program has not drained.
    #[arg(long, default_value_t = 100_000)]
    max_cycles: u64,

    /// Dump the final machine state as JSON instead of the report.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.file).unwrap_or_else(|e| {
        eprintln!("error: could not read `{}`: {e}", cli.file);
        process::exit(1);
    });

    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error: could not read `{path}`: {e}");
                process::exit(1);
            });
            serde_json::from_str::<Config>(&text).unwrap_or_else(|e| {
                eprintln!("error: bad configuration in `{path}`: {e}");
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    let seeds = parse_register_seeds(&cli.registers);
    let seed_refs: Vec<(&str, f64)> = seeds.iter().map(|(n, v)| (n.as_str(), *v)).collect();

    let mut sim = Simulator::new(&source, config, &seed_refs).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    let outcome = sim.run(cli.max_cycles).unwrap_or_else(|e| {
        eprintln!("engine error: {e}");
        process::exit(1);
    });

    if cli.json {
        match sim.snapshot() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not serialize state: {e}");
                process::exit(1);
            }
        }
        return;
    }

    print_report(sim.state(), outcome);
    print!("{}", sim.stats().report());
}

/// Parses `NAME=VALUE` register seeds, exiting on a malformed entry.
fn parse_register_seeds(entries: &[String]) -> Vec<(String, f64)> {
    entries
        .iter()
        .map(|entry| {
            let parsed = entry.split_once('=').and_then(|(name, value)| {
                Some((name.trim().to_string(), value.trim().parse::<f64>().ok()?))
            });
            parsed.unwrap_or_else(|| {
                eprintln!("error: bad register seed `{entry}` (want NAME=VALUE)");
                process::exit(1);
            })
        })
        .collect()
}

/// Prints the timing table and event log.
fn print_report(state: &MachineState, outcome: RunOutcome) {
    match outcome {
        RunOutcome::Finished { cycles } => println!("Finished in {cycles} cycles.\n"),
        RunOutcome::CycleLimit { cycles } => {
            println!("Cycle limit reached at {cycles} cycles (program not drained).\n");
        }
    }

    println!("{:<4} {:<28} {:>6} {:>11} {:>6}", "#", "Instruction", "Issue", "Exec", "Write");
    for inst in &state.instructions {
        println!(
            "{:<4} {:<28} {:>6} {:>11} {:>6}",
            inst.id,
            inst.text,
            fmt_cycle(inst.issue_cycle),
            fmt_exec(inst),
            fmt_cycle(inst.write_cycle),
        );
    }

    if !state.log.is_empty() {
        println!("\nEvents:");
        for event in state.log.events() {
            println!("  {event}");
        }
    }
    println!();
}

fn fmt_cycle(cycle: Option<u64>) -> String {
    cycle.map_or_else(|| "-".to_string(), |c| c.to_string())
}

fn fmt_exec(inst: &DynInst) -> String {
    match (inst.exec_start_cycle, inst.exec_end_cycle) {
        (Some(start), Some(end)) => format!("{start}-{end}"),
        (Some(start), None) => format!("{start}-"),
        _ => "-".to_string(),
    }
}
