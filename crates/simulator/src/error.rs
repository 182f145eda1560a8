//! Simulator errors.

use thiserror::Error;
use transducer_simulation::NetworkError;

/// Errors from simulator runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulatorError {
    /// Building or stepping the network failed.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// An exploration was asked for zero runs.
    #[error("exploration needs at least one run")]
    NoRuns,
}
