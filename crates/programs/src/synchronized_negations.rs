//! Synchronizing the negated relation is not enough for consistency.

use crate::{node, pair, pair_inputs, Proof, RANDOM_SUFFIX};
use tracing::info;
use transducer_core::Transducer;
use transducer_simulation::{Delivery, NetworkError, TransducerNetwork};
use transducer_types::{
    tuple, Database, DatabaseSchema, Relation, TransducerSchema, TransducerState,
};

/// The only negated relation, synchronized after every scripted step.
const NEGATED: &str = "R";

/// Replicates its input on two channels, caches what it receives, and
/// outputs `A - R`:
///
/// ```text
/// A(a) :- I(a)        R(a) :- I(a)
/// A += A              R += R
/// O(a) :- A(a), !R(a)
/// ```
///
/// Even with memory `R` synchronized across the network before every step,
/// the output depends on whether `A` or `R` facts arrive first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynchronizedNegationsButNotConsistent;

impl SynchronizedNegationsButNotConsistent {
    /// `{X: {Y}, Y: {X}}` with `I@X = {1}` and `I@Y = {2}`.
    pub fn example() -> Result<TransducerNetwork<Self>, NetworkError> {
        TransducerNetwork::new(pair(), Self, pair_inputs(&[1], &[2]))
    }

    /// Delivering `A` facts first yields `{1, 2}`; delivering `R` facts
    /// first yields nothing. Both runs then take random steps.
    pub fn proof() -> Result<Proof, NetworkError> {
        let first = Self::run_delivering_first("A")?;
        let second = Self::run_delivering_first(NEGATED)?;
        info!(agrees = first == second, "Synchronized negations proof finished");
        Ok(Proof { first, second })
    }

    fn run_delivering_first(channel: &str) -> Result<Database, NetworkError> {
        let script = [
            ("X", Delivery::none()),
            ("Y", Delivery::new().with(channel, [tuple!(1)])),
            ("Y", Delivery::none()),
            ("X", Delivery::new().with(channel, [tuple!(2)])),
            ("X", Delivery::none()),
        ];

        let mut network = Self::example()?;
        for (name, delivery) in script {
            network.step(&node(name), delivery)?;
            network.sync_mem_relation(NEGATED)?;
        }
        network.random_steps(RANDOM_SUFFIX)?;
        Ok(network.out())
    }
}

impl Transducer for SynchronizedNegationsButNotConsistent {
    fn schema(&self) -> TransducerSchema {
        let unary = DatabaseSchema::new().with("A", 1).with("R", 1);
        TransducerSchema::new(
            DatabaseSchema::new().with("I", 1),
            DatabaseSchema::new().with("O", 1),
            unary.clone(),
            unary,
        )
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        state
            .mem
            .relation("A")
            .difference(state.mem.relation(NEGATED))
            .cloned()
            .collect()
    }

    fn snd(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.input.relation("I").clone()
    }

    fn add(&self, relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation(relation).clone()
    }
}
