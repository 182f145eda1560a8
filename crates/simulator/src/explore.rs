//! Consistency exploration: the same program under many seeds.

use crate::{Simulator, SimulatorError};
use serde::Serialize;
use tracing::{debug, info};
use transducer_types::Database;

/// A quiescent output and the runs that reached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The quiescent output.
    pub output: Database,
    /// Seeds of the runs that quiesced at this output.
    pub seeds: Vec<u64>,
}

/// Distinct quiescent outputs observed across an exploration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Name of the explored program.
    pub program: String,
    /// Number of runs.
    pub runs: usize,
    /// Step bound of each run.
    pub max_steps: usize,
    /// Outcomes in the order they were first observed.
    pub outcomes: Vec<Outcome>,
    /// Seeds of runs that hit the step bound.
    pub unquiesced: Vec<u64>,
}

impl ConsistencyReport {
    /// Whether exactly one quiescent output was observed.
    pub fn is_consistent(&self) -> bool {
        self.outcomes.len() == 1
    }
}

impl Simulator {
    /// Run the configured program once per seed `seed..seed + runs` and
    /// group the runs by quiescent output.
    pub fn explore(&self) -> Result<ConsistencyReport, SimulatorError> {
        let config = self.config();
        if config.runs == 0 {
            return Err(SimulatorError::NoRuns);
        }

        let mut outcomes: Vec<Outcome> = Vec::new();
        let mut unquiesced = Vec::new();

        for run in 0..config.runs {
            let seed = config.seed_for_run(run);
            let report = self.run_with_seed(seed)?;
            debug!(seed, steps = report.steps, "Exploration run finished");

            let Some(output) = report.output else {
                unquiesced.push(seed);
                continue;
            };
            match outcomes.iter_mut().find(|o| o.output == output) {
                Some(outcome) => outcome.seeds.push(seed),
                None => outcomes.push(Outcome {
                    output,
                    seeds: vec![seed],
                }),
            }
        }

        info!(
            program = %config.program,
            runs = config.runs,
            outputs = outcomes.len(),
            unquiesced = unquiesced.len(),
            "Exploration finished"
        );

        Ok(ConsistencyReport {
            program: config.program.to_string(),
            runs: config.runs,
            max_steps: config.max_steps,
            outcomes,
            unquiesced,
        })
    }
}
