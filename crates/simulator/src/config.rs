//! Configuration types for the simulator.

use transducer_programs::Program;
use transducer_simulation::{SimulationConfig, DEFAULT_SEED};

/// Default bound on random steps per run.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Default number of consecutive unchanged steps before a run counts as
/// quiescent.
pub const DEFAULT_QUIET_STEPS: usize = 20;

/// Default number of seeds tried by an exploration.
pub const DEFAULT_RUNS: usize = 20;

/// Configuration for simulator runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Example program to run.
    pub program: Program,

    /// Seed of the first run. Exploration run `i` uses `seed + i`.
    pub seed: u64,

    /// Random steps after which a run is abandoned as not quiesced.
    pub max_steps: usize,

    /// Consecutive random steps, covering every node, that must leave the
    /// output unchanged before a run counts as quiescent.
    pub quiet_steps: usize,

    /// Number of runs in an exploration.
    pub runs: usize,

    /// Record a snapshot before every step.
    pub trace: bool,
}

impl SimulatorConfig {
    /// Create a configuration for `program` with default limits.
    pub fn new(program: Program) -> Self {
        Self {
            program,
            seed: DEFAULT_SEED,
            max_steps: DEFAULT_MAX_STEPS,
            quiet_steps: DEFAULT_QUIET_STEPS,
            runs: DEFAULT_RUNS,
            trace: false,
        }
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the per-run step bound.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the quiet window length.
    pub fn with_quiet_steps(mut self, quiet_steps: usize) -> Self {
        self.quiet_steps = quiet_steps;
        self
    }

    /// Set the number of exploration runs.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Enable or disable trace recording.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Seed of exploration run `run`.
    pub fn seed_for_run(&self, run: usize) -> u64 {
        self.seed.wrapping_add(run as u64)
    }

    /// Convert to a SimulationConfig for the underlying network.
    pub fn to_simulation_config(&self) -> SimulationConfig {
        SimulationConfig::new().with_seed(self.seed)
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(Program::Monotone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SimulatorConfig::new(Program::SuperMonotone)
            .with_seed(7)
            .with_max_steps(50)
            .with_quiet_steps(4)
            .with_runs(3)
            .with_trace(true);

        assert_eq!(config.program, Program::SuperMonotone);
        assert_eq!(config.max_steps, 50);
        assert_eq!(config.quiet_steps, 4);
        assert_eq!(config.runs, 3);
        assert!(config.trace);
        assert_eq!(config.to_simulation_config().seed, 7);
        assert_eq!(config.seed_for_run(2), 9);
    }

    #[test]
    fn test_default_uses_default_seed() {
        let config = SimulatorConfig::default();
        assert_eq!(config.seed, DEFAULT_SEED);
        assert!(!config.trace);
    }
}
