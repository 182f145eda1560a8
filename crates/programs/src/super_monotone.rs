//! No deletions anywhere, still not consistent.

use crate::{node, pair, pair_inputs, Proof, RANDOM_SUFFIX};
use tracing::info;
use transducer_core::Transducer;
use transducer_simulation::{Delivery, NetworkError, TransducerNetwork};
use transducer_types::{
    tuple, Database, DatabaseSchema, NodeId, Relation, TransducerSchema, TransducerState,
};

/// `O(a, b) :- I(a), I(b), a != b`.
///
/// The program never deletes from its channels or memory and its only rule
/// is monotone. It also never communicates, so its output depends on how
/// the input facts are placed on the nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuperMonotoneButNotConsistent;

impl SuperMonotoneButNotConsistent {
    /// `{X: {Y}, Y: {X}}` with the given inputs.
    pub fn example<I>(inputs: I) -> Result<TransducerNetwork<Self>, NetworkError>
    where
        I: IntoIterator<Item = (NodeId, Database)>,
    {
        TransducerNetwork::new(pair(), Self, inputs)
    }

    /// Both facts on `X` yields `{(1, 2), (2, 1)}`; one fact per node yields
    /// nothing.
    pub fn proof() -> Result<Proof, NetworkError> {
        let mut network = Self::example(pair_inputs(&[1, 2], &[]))?;
        network.step(&node("X"), Delivery::none())?;
        network.random_steps(RANDOM_SUFFIX)?;
        let first = network.out();

        let mut network = Self::example(pair_inputs(&[1], &[2]))?;
        network.step(&node("X"), Delivery::none())?;
        network.step(&node("Y"), Delivery::none())?;
        network.random_steps(RANDOM_SUFFIX)?;
        let second = network.out();

        info!(agrees = first == second, "Super-monotone proof finished");
        Ok(Proof { first, second })
    }
}

impl Transducer for SuperMonotoneButNotConsistent {
    fn schema(&self) -> TransducerSchema {
        TransducerSchema::new(
            DatabaseSchema::new().with("I", 1),
            DatabaseSchema::new().with("O", 2),
            DatabaseSchema::new(),
            DatabaseSchema::new(),
        )
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        let input = state.input.relation("I");
        let values = input.iter().filter_map(|t| t.get(0));

        values
            .clone()
            .flat_map(|a| {
                values
                    .clone()
                    .filter(move |b| *b != a)
                    .map(move |b| tuple!(a.clone(), b.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_pairs_distinct_values() {
        let inputs = pair_inputs(&[1, 2, 3], &[]);
        let mut network = SuperMonotoneButNotConsistent::example(inputs).unwrap();
        network.step(&node("X"), Delivery::none()).unwrap();

        let out = network.out();
        assert_eq!(out.relation("O").len(), 6);
        assert!(!out.relation("O").contains(&tuple!(1, 1)));
        assert!(out.relation("O").contains(&tuple!(3, 1)));
    }

    #[test]
    fn test_proof_outputs_differ() {
        let proof = SuperMonotoneButNotConsistent::proof().unwrap();

        let expected: Relation = [tuple!(1, 2), tuple!(2, 1)].into_iter().collect();
        assert_eq!(proof.first.relation("O"), &expected);
        assert!(proof.second.relation("O").is_empty());
        assert!(!proof.agrees());
    }
}
