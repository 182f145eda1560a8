//! Configuration for network simulation.

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 12345;

/// Configuration for a [`TransducerNetwork`](crate::TransducerNetwork).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Seed for the scheduler's random source.
    ///
    /// Two networks built from the same topology, program, inputs and seed
    /// take identical random steps.
    pub seed: u64,
}

impl SimulationConfig {
    /// Create a configuration with the default seed.
    pub fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
