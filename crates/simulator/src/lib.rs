//! Transducer simulator
//!
//! Seeded random runs of the example programs, built on top of
//! `transducer-simulation`.
//!
//! - **Runs**: one seeded random run until the output stays unchanged for a
//!   quiet window covering every node, or a step bound
//! - **Traces**: a serializable snapshot before every step, replayable as
//!   scripted steps
//! - **Exploration**: many seeds, grouped by quiescent output, to look for
//!   inconsistency
//! - **Configuration**: program, seed, step bound, quiet window, run count
//!
//! # Example
//!
//! ```no_run
//! use transducer_programs::Program;
//! use transducer_simulator::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(Program::Monotone)
//!     .with_runs(50)
//!     .with_max_steps(1_000);
//!
//! let report = Simulator::new(config).explore()?;
//! println!("{} distinct outputs", report.outcomes.len());
//! # Ok::<(), transducer_simulator::SimulatorError>(())
//! ```

pub mod config;
pub mod error;
pub mod explore;
pub mod quiescence;
pub mod runner;
pub mod trace;

pub use config::{SimulatorConfig, DEFAULT_MAX_STEPS, DEFAULT_QUIET_STEPS, DEFAULT_RUNS};
pub use error::SimulatorError;
pub use explore::{ConsistencyReport, Outcome};
pub use quiescence::{settle, QuietWindow};
pub use runner::{RunReport, Simulator};
pub use trace::{NodeSnapshot, Snapshot, Trace, TraceEntry, TraceStep};
