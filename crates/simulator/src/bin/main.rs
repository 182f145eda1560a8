//! Transducer simulator CLI
//!
//! Runs the example transducer programs: scripted proofs, seeded random
//! runs with optional JSON traces, and consistency exploration.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use transducer_programs::Program;
use transducer_simulator::{
    Simulator, SimulatorConfig, DEFAULT_MAX_STEPS, DEFAULT_QUIET_STEPS, DEFAULT_RUNS,
};
use transducer_simulation::DEFAULT_SEED;

#[derive(Parser)]
#[command(name = "transducer-sim")]
#[command(about = "Simulator for relational transducer networks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program's two scripted proof runs and print both outputs
    Proof {
        /// Program (reflexive-pairs, monotone, super-monotone, synchronized-negations)
        program: Program,
    },

    /// Run a program at random until its output quiesces
    Run {
        /// Program (reflexive-pairs, monotone, super-monotone, synchronized-negations)
        program: Program,

        /// Random seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Give up after this many random steps
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Unchanged steps, covering every node, before a run counts as quiescent
        #[arg(long, default_value_t = DEFAULT_QUIET_STEPS)]
        quiet_steps: usize,

        /// Write the run's trace as JSON to this file
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run a program under many seeds and report every quiescent output
    Explore {
        /// Program (reflexive-pairs, monotone, super-monotone, synchronized-negations)
        program: Program,

        /// Seed of the first run
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Number of runs
        #[arg(long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        /// Give up on a run after this many random steps
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Unchanged steps, covering every node, before a run counts as quiescent
        #[arg(long, default_value_t = DEFAULT_QUIET_STEPS)]
        quiet_steps: usize,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Proof { program } => {
            let proof = Simulator::new(SimulatorConfig::new(program)).proof()?;
            println!("{}", program);
            println!("  first:  {}", proof.first);
            println!("  second: {}", proof.second);
            println!("  agree:  {}", proof.agrees());
        }

        Commands::Run {
            program,
            seed,
            max_steps,
            quiet_steps,
            trace,
            json,
        } => {
            let config = SimulatorConfig::new(program)
                .with_seed(seed)
                .with_max_steps(max_steps)
                .with_quiet_steps(quiet_steps)
                .with_trace(trace.is_some());
            let mut report = Simulator::new(config).run()?;

            if let (Some(path), Some(recorded)) = (&trace, report.trace.take()) {
                let file = File::create(path)
                    .with_context(|| format!("creating trace file {}", path.display()))?;
                serde_json::to_writer_pretty(BufWriter::new(file), &recorded)
                    .with_context(|| format!("writing trace to {}", path.display()))?;
                println!("Wrote {} steps to {}", recorded.len(), path.display());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                match &report.output {
                    Some(out) => println!("{} quiesced after {} steps: {}", program, report.steps, out),
                    None => println!("{} did not quiesce within {} steps", program, max_steps),
                }
            }
        }

        Commands::Explore {
            program,
            seed,
            runs,
            max_steps,
            quiet_steps,
            json,
        } => {
            let config = SimulatorConfig::new(program)
                .with_seed(seed)
                .with_runs(runs)
                .with_max_steps(max_steps)
                .with_quiet_steps(quiet_steps);
            let report = Simulator::new(config).explore()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}: {} runs, {} distinct outputs", program, runs, report.outcomes.len());
                for outcome in &report.outcomes {
                    println!("  {:>4} runs: {}", outcome.seeds.len(), outcome.output);
                }
                if !report.unquiesced.is_empty() {
                    println!("  {:>4} runs did not quiesce", report.unquiesced.len());
                }
                let verdict = if report.is_consistent() { "consistent" } else { "not consistent" };
                println!("  {}", verdict);
            }
        }
    }

    Ok(())
}
