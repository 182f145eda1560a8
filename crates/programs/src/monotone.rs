//! Monotone rules are not enough for consistency.

use crate::{node, pair, pair_inputs, Proof};
use tracing::info;
use transducer_core::Transducer;
use transducer_simulation::{Delivery, NetworkError, TransducerNetwork};
use transducer_types::{tuple, DatabaseSchema, Relation, TransducerSchema, TransducerState};

/// Rounds of paired deliveries in the second proof run.
const PAIRED_ROUNDS: usize = 100;

/// Every rule is monotone, yet the network is not consistent:
///
/// ```text
/// A(a) :- I(a)        R(a) :- I(a)
/// M += A              M -= R
/// O(a) :- M(a)
/// ```
///
/// A node that receives `A(a)` and `R(a)` in the same step cancels the
/// memory update, so delivering them together forever keeps `M` empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotoneButNotConsistent;

impl MonotoneButNotConsistent {
    /// `{X: {Y}, Y: {X}}` with `I@X = {1}` and `I@Y = {2}`.
    pub fn example() -> Result<TransducerNetwork<Self>, NetworkError> {
        TransducerNetwork::new(pair(), Self, pair_inputs(&[1], &[2]))
    }

    /// The first run delivers only `A` facts and quiesces at `{1, 2}`. The
    /// second always delivers `A` and `R` together and outputs nothing.
    pub fn proof() -> Result<Proof, NetworkError> {
        let mut network = Self::example()?;
        network.step(&node("X"), Delivery::none())?;
        network.step(&node("Y"), Delivery::none())?;
        network.step(&node("X"), Delivery::new().with("A", [tuple!(2)]))?;
        network.step(&node("X"), Delivery::none())?;
        network.step(&node("Y"), Delivery::new().with("A", [tuple!(1)]))?;
        network.step(&node("Y"), Delivery::none())?;
        let first = network.out();

        let mut network = Self::example()?;
        network.step(&node("X"), Delivery::none())?;
        for _ in 0..PAIRED_ROUNDS {
            let both = |v: i64| {
                Delivery::new()
                    .with("A", [tuple!(v)])
                    .with("R", [tuple!(v)])
            };
            network.step(&node("Y"), both(1))?;
            network.step(&node("X"), both(2))?;
        }
        let second = network.out();

        info!(agrees = first == second, "Monotone proof finished");
        Ok(Proof { first, second })
    }
}

impl Transducer for MonotoneButNotConsistent {
    fn schema(&self) -> TransducerSchema {
        TransducerSchema::new(
            DatabaseSchema::new().with("I", 1),
            DatabaseSchema::new().with("O", 1),
            DatabaseSchema::new().with("A", 1).with("R", 1),
            DatabaseSchema::new().with("M", 1),
        )
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.mem.relation("M").clone()
    }

    fn snd(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.input.relation("I").clone()
    }

    fn add(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation("A").clone()
    }

    fn rem(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation("R").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unary;
    use tracing_test::traced_test;

    #[test]
    fn test_step_sends_input_on_both_channels() {
        let mut network = MonotoneButNotConsistent::example().unwrap();
        network.step(&node("X"), Delivery::none()).unwrap();

        let buffer = network.buffer(&node("Y")).unwrap();
        for channel in ["A", "R"] {
            assert_eq!(buffer.pending(channel).unwrap().count(&tuple!(1)), 1);
        }
    }

    #[test]
    fn test_paired_delivery_leaves_memory_untouched() {
        let mut network = MonotoneButNotConsistent::example().unwrap();
        network.step(&node("X"), Delivery::none()).unwrap();
        network
            .step(
                &node("Y"),
                Delivery::new()
                    .with("A", [tuple!(1)])
                    .with("R", [tuple!(1)]),
            )
            .unwrap();

        assert!(network.state(&node("Y")).unwrap().mem.relation("M").is_empty());
    }

    #[traced_test]
    #[test]
    fn test_proof_outputs_differ() {
        let proof = MonotoneButNotConsistent::proof().unwrap();

        assert_eq!(proof.first.relation("O"), &unary(&[1, 2]));
        assert!(proof.second.relation("O").is_empty());
        assert!(!proof.agrees());
        assert!(logs_contain("Monotone proof finished"));
    }
}
