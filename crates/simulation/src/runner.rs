//! Randomized scheduling and quiescence detection.

use crate::{NetworkError, StepRecord, TransducerNetwork};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, trace, warn};
use transducer_core::Transducer;
use transducer_types::Database;

/// Counters accumulated over the lifetime of a network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Steps executed (scripted and random).
    pub steps: u64,
    /// Steps whose node and delivery were chosen at random.
    pub random_steps: u64,
    /// Message copies consumed from buffers.
    pub facts_delivered: u64,
    /// Facts sent (counted once per step, not per neighbor).
    pub facts_sent: u64,
    /// Memory synchronizations performed.
    pub mem_syncs: u64,
}

impl<T: Transducer, R: Rng> TransducerNetwork<T, R> {
    /// Step a uniformly random node with a uniformly random selection of its
    /// pending messages.
    ///
    /// For each message relation independently, the number of delivered
    /// copies is uniform in `[0, pending]` and the copies are drawn uniformly
    /// from the pending ones.
    pub fn random_step(&mut self) -> Result<StepRecord, NetworkError> {
        let node = self
            .nodes
            .choose(&mut self.rng)
            .cloned()
            .ok_or(NetworkError::EmptyNetwork)?;
        let delivery = match self.buffers.get(&node) {
            Some(buffer) => buffer.sample(&mut self.rng),
            None => return Err(NetworkError::UnknownNode(node)),
        };

        trace!(node = %node, selected = delivery.fact_count(), "Chose random step");

        let record = self.step(&node, delivery)?;
        self.stats.random_steps += 1;
        Ok(record)
    }

    /// Take random steps until the output is unchanged by a step, and return
    /// that output.
    ///
    /// There is no bound: a program whose output keeps changing runs forever.
    /// Use [`run_bounded`](Self::run_bounded) to cap the number of steps.
    pub fn run(&mut self) -> Result<Database, NetworkError> {
        let mut previous = self.out();
        let mut steps = 0u64;
        loop {
            self.random_step()?;
            steps += 1;
            let current = self.out();
            if current == previous {
                info!(steps, facts = current.fact_count(), "Output quiesced");
                return Ok(current);
            }
            previous = current;
        }
    }

    /// Like [`run`](Self::run), but give up after `max_steps` random steps.
    ///
    /// Returns `None` if the output was still changing at the bound.
    pub fn run_bounded(&mut self, max_steps: usize) -> Result<Option<Database>, NetworkError> {
        let mut previous = self.out();
        for steps in 1..=max_steps {
            self.random_step()?;
            let current = self.out();
            if current == previous {
                info!(steps, facts = current.fact_count(), "Output quiesced");
                return Ok(Some(current));
            }
            previous = current;
        }

        warn!(max_steps, "Output did not quiesce within the step bound");
        Ok(None)
    }

    /// Take exactly `n` random steps.
    pub fn random_steps(&mut self, n: usize) -> Result<(), NetworkError> {
        for _ in 0..n {
            self.random_step()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Delivery;
    use tracing_test::traced_test;
    use transducer_test_helpers::{node, pair, pair_inputs, Silent, Ticker};

    #[traced_test]
    #[test]
    fn test_run_logs_quiescence() {
        let mut network = TransducerNetwork::new(pair(), Silent, pair_inputs(&[1], &[2])).unwrap();

        let out = network.run().unwrap();

        assert_eq!(out.fact_count(), 0);
        assert_eq!(network.stats().random_steps, 1);
        assert!(logs_contain("Output quiesced"));
    }

    #[traced_test]
    #[test]
    fn test_run_bounded_logs_exhaustion() {
        let mut network = TransducerNetwork::new(pair(), Ticker, pair_inputs(&[1], &[2])).unwrap();

        assert_eq!(network.run_bounded(5).unwrap(), None);
        assert!(logs_contain("did not quiesce"));
    }

    #[test]
    fn test_run_bounded_zero_steps() {
        let mut network = TransducerNetwork::new(pair(), Ticker, pair_inputs(&[1], &[2])).unwrap();

        assert_eq!(network.run_bounded(0).unwrap(), None);
        assert_eq!(network.stats().steps, 0);
    }

    #[traced_test]
    #[test]
    fn test_scripted_and_random_steps_share_counters() {
        let mut network = TransducerNetwork::new(pair(), Silent, pair_inputs(&[1], &[2])).unwrap();

        network.step(&node("X"), Delivery::none()).unwrap();
        network.random_step().unwrap();

        assert_eq!(network.stats().steps, 2);
        assert_eq!(network.stats().random_steps, 1);
        assert!(logs_contain("Stepped node"));
    }
}
