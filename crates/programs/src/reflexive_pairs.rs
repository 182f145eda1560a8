//! A purely local query: keep the reflexive pairs of the input.

use crate::{node, Proof};
use tracing::info;
use transducer_core::Transducer;
use transducer_simulation::{Delivery, NetworkError, TransducerNetwork};
use transducer_types::{
    tuple, Database, DatabaseSchema, NodeId, Relation, Topology, TransducerSchema,
    TransducerState,
};

/// `T(x, y) :- R(x, y), x = y`.
///
/// No messages and no memory: every node answers from its own input, so
/// every schedule that steps each node at least once reaches the same
/// output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflexivePairs;

impl ReflexivePairs {
    /// The complete graph on `A`, `B`, `C`.
    pub fn topology() -> Topology {
        Topology::complete([node("A"), node("B"), node("C")])
    }

    /// Each node holds the full square over two values of its own.
    pub fn inputs() -> Vec<(NodeId, Database)> {
        [("A", 1, 2), ("B", 3, 4), ("C", 5, 6)]
            .into_iter()
            .map(|(name, a, b)| {
                let square = [tuple!(a, a), tuple!(a, b), tuple!(b, a), tuple!(b, b)];
                (node(name), Database::new().with("R", square))
            })
            .collect()
    }

    /// The three-node example network.
    pub fn example() -> Result<TransducerNetwork<Self>, NetworkError> {
        TransducerNetwork::new(Self::topology(), Self, Self::inputs())
    }

    /// Step every node once, in two opposite orders. Both runs output the
    /// six reflexive pairs.
    pub fn proof() -> Result<Proof, NetworkError> {
        let first = Self::run_in_order(&["A", "B", "C"])?;
        let second = Self::run_in_order(&["C", "B", "A"])?;
        info!(agrees = first == second, "Reflexive pairs proof finished");
        Ok(Proof { first, second })
    }

    fn run_in_order(order: &[&str]) -> Result<Database, NetworkError> {
        let mut network = Self::example()?;
        for name in order {
            network.step(&node(name), Delivery::none())?;
        }
        Ok(network.out())
    }
}

impl Transducer for ReflexivePairs {
    fn schema(&self) -> TransducerSchema {
        TransducerSchema::new(
            DatabaseSchema::new().with("R", 2),
            DatabaseSchema::new().with("T", 2),
            DatabaseSchema::new(),
            DatabaseSchema::new(),
        )
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        state
            .input
            .relation("R")
            .iter()
            .filter(|t| t.get(0) == t.get(1))
            .cloned()
            .collect()
    }
}
