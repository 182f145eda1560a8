//! Seeded runs of the example programs.

use crate::{settle, SimulatorConfig, SimulatorError, Trace};
use serde::Serialize;
use tracing::{info, warn};
use transducer_programs::{Program, Proof};
use transducer_types::Database;

/// Result of one seeded random run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Name of the program that ran.
    pub program: String,
    /// Seed of the scheduler.
    pub seed: u64,
    /// Random steps taken.
    pub steps: u64,
    /// The quiescent output, or `None` if the step bound was hit first.
    pub output: Option<Database>,
    /// The recorded run, if tracing was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Trace>,
}

/// Drives the example programs according to a [`SimulatorConfig`].
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The simulator's configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run the configured program's two scripted proof runs.
    pub fn proof(&self) -> Result<Proof, SimulatorError> {
        Ok(self.config.program.proof()?)
    }

    /// One random run from the configured seed until a quiet window
    /// completes or the step bound is hit.
    pub fn run(&self) -> Result<RunReport, SimulatorError> {
        self.run_with_seed(self.config.seed)
    }

    /// One random run with an explicit seed.
    pub fn run_with_seed(&self, seed: u64) -> Result<RunReport, SimulatorError> {
        let program = self.config.program;
        let config = self.config.clone().with_seed(seed);
        let mut network = program.network(config.to_simulation_config())?;

        let (output, trace) = if config.trace {
            let trace = Trace::record(&mut network, config.max_steps, config.quiet_steps)?;
            let output = trace.quiesced.then(|| network.out());
            (output, Some(trace))
        } else {
            let output = settle(&mut network, config.max_steps, config.quiet_steps)?;
            (output, None)
        };

        let steps = network.stats().random_steps;
        match &output {
            Some(out) => info!(%program, seed, steps, facts = out.fact_count(), "Run quiesced"),
            None => warn!(%program, seed, steps, "Run hit the step bound"),
        }

        Ok(RunReport {
            program: program.to_string(),
            seed,
            steps,
            output,
            trace,
        })
    }

    /// The configured program.
    pub fn program(&self) -> Program {
        self.config.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_run_reports_quiescent_output() {
        let simulator = Simulator::new(SimulatorConfig::new(Program::SuperMonotone).with_seed(3));

        let report = simulator.run().unwrap();

        assert_eq!(report.program, "super-monotone");
        assert_eq!(report.seed, 3);
        assert!(report.trace.is_none());
        let output = report.output.unwrap();
        assert!(output.relation("O").is_empty());
        assert!(logs_contain("Run quiesced"));
    }

    #[test]
    fn test_same_seed_same_report() {
        let simulator = Simulator::new(SimulatorConfig::new(Program::Monotone));
        assert_eq!(
            simulator.run_with_seed(5).unwrap(),
            simulator.run_with_seed(5).unwrap()
        );
    }

    #[test]
    fn test_traced_run_matches_untraced_run() {
        let config = SimulatorConfig::new(Program::SynchronizedNegations).with_seed(8);
        let plain = Simulator::new(config.clone()).run().unwrap();
        let traced = Simulator::new(config.with_trace(true)).run().unwrap();

        let trace = traced.trace.unwrap();
        assert_eq!(trace.len() as u64, traced.steps);
        assert_eq!(plain.steps, traced.steps);
        assert_eq!(plain.output, traced.output);
    }

    #[traced_test]
    #[test]
    fn test_zero_step_bound() {
        let config = SimulatorConfig::new(Program::Monotone).with_max_steps(0);
        let report = Simulator::new(config).run().unwrap();

        assert_eq!(report.steps, 0);
        assert_eq!(report.output, None);
        assert!(logs_contain("Run hit the step bound"));
    }
}
