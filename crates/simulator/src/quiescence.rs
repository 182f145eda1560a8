//! Stop condition for simulator runs.
//!
//! A network's own `run` stops at the first step that leaves the output
//! unchanged. A single idle step says little when most nodes have not acted
//! yet, so simulator runs wait for a quiet window instead: the output must
//! stay unchanged for at least `quiet_steps` consecutive random steps, and
//! every node must have stepped inside that window.

use rand::Rng;
use std::collections::BTreeSet;
use transducer_core::Transducer;
use transducer_simulation::{NetworkError, StepRecord, TransducerNetwork};
use transducer_types::{Database, NodeId};

/// Tracks how long the output has been unchanged, and which nodes stepped
/// meanwhile.
#[derive(Debug, Clone)]
pub struct QuietWindow {
    required: usize,
    nodes: usize,
    previous: Database,
    quiet: usize,
    stepped: BTreeSet<NodeId>,
}

impl QuietWindow {
    /// Start watching `network`, whose current output opens the window.
    pub fn new<T, R>(network: &TransducerNetwork<T, R>, quiet_steps: usize) -> Self
    where
        T: Transducer,
        R: Rng,
    {
        Self {
            required: quiet_steps,
            nodes: network.nodes().len(),
            previous: network.out(),
            quiet: 0,
            stepped: BTreeSet::new(),
        }
    }

    /// Record a step and the output after it. Returns `true` once the
    /// window is complete.
    pub fn observe(&mut self, step: &StepRecord, output: Database) -> bool {
        if output != self.previous {
            self.previous = output;
            self.quiet = 0;
            self.stepped.clear();
            return false;
        }

        self.quiet += 1;
        self.stepped.insert(step.node.clone());
        self.quiet >= self.required && self.stepped.len() == self.nodes
    }

    /// Consecutive steps without an output change so far.
    pub fn quiet(&self) -> usize {
        self.quiet
    }
}

/// Take random steps until a quiet window completes or `max_steps` random
/// steps were taken. Returns the settled output, or `None` at the bound.
pub fn settle<T, R>(
    network: &mut TransducerNetwork<T, R>,
    max_steps: usize,
    quiet_steps: usize,
) -> Result<Option<Database>, NetworkError>
where
    T: Transducer,
    R: Rng,
{
    let mut window = QuietWindow::new(network, quiet_steps);
    for _ in 0..max_steps {
        let record = network.random_step()?;
        let output = network.out();
        if window.observe(&record, output) {
            return Ok(Some(network.out()));
        }
    }
    Ok(None)
}
