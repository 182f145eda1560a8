//! Test helpers for transducer networks.
//!
//! Small fixture programs with predictable behavior, plus shorthand for
//! building node identifiers, relations and two-node topologies.

use transducer_core::Transducer;
use transducer_types::{
    tuple, Database, DatabaseSchema, NodeId, Relation, Topology, TransducerSchema,
    TransducerState, SYS_ID,
};

/// Shorthand for a node identifier.
pub fn node(name: &str) -> NodeId {
    NodeId::from(name)
}

/// A relation of unary integer tuples.
pub fn unary(values: &[i64]) -> Relation {
    values.iter().map(|v| tuple!(*v)).collect()
}

/// The symmetric two-node network `{X: {Y}, Y: {X}}`.
pub fn pair() -> Topology {
    Topology::symmetric([(node("X"), node("Y"))])
}

/// Inputs `I@X = {x}` and `I@Y = {y}` for the two-node network.
pub fn pair_inputs(x: &[i64], y: &[i64]) -> Vec<(NodeId, Database)> {
    vec![
        (node("X"), Database::new().with("I", unary(x))),
        (node("Y"), Database::new().with("I", unary(y))),
    ]
}

/// A unary schema `I -> O` with message relation `A` and memory `M`.
fn unary_schema() -> TransducerSchema {
    TransducerSchema::new(
        DatabaseSchema::new().with("I", 1),
        DatabaseSchema::new().with("O", 1),
        DatabaseSchema::new().with("A", 1),
        DatabaseSchema::new().with("M", 1),
    )
}

/// Does nothing: no output, no sends, no memory changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Transducer for Silent {
    fn schema(&self) -> TransducerSchema {
        unary_schema()
    }

    fn out(&self, _relation: &str, _state: &TransducerState) -> Relation {
        Relation::new()
    }
}

/// Broadcasts its input over `A` every step, remembers every delivered `A`
/// fact in `M`, and outputs its input plus everything remembered.
///
/// Monotone: on a connected network every run converges to the union of
/// all inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flood;

impl Transducer for Flood {
    fn schema(&self) -> TransducerSchema {
        unary_schema()
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        state
            .input
            .relation("I")
            .union(state.mem.relation("M"))
            .cloned()
            .collect()
    }

    fn snd(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.input.relation("I").clone()
    }

    fn add(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation("A").clone()
    }
}

/// Forwards every delivered `A` fact and its own input, forever.
///
/// Outputs whatever it received this step, so its output grows as long as
/// new facts keep arriving.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relay;

impl Transducer for Relay {
    fn schema(&self) -> TransducerSchema {
        unary_schema()
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation("A").clone()
    }

    fn snd(&self, _relation: &str, state: &TransducerState) -> Relation {
        state
            .input
            .relation("I")
            .union(state.msg.relation("A"))
            .cloned()
            .collect()
    }
}

/// Sends ternary tuples over the unary `A` relation: always a schema defect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Misbehaving;

impl Transducer for Misbehaving {
    fn schema(&self) -> TransducerSchema {
        unary_schema()
    }

    fn out(&self, _relation: &str, _state: &TransducerState) -> Relation {
        Relation::new()
    }

    fn snd(&self, _relation: &str, _state: &TransducerState) -> Relation {
        [tuple!(1, 2, 3)].into_iter().collect()
    }
}

/// Counts its own steps: each step remembers and outputs a fact naming the
/// node and the number of steps it took before. Facts from different nodes
/// never coincide, so the network output never stops growing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ticker;

impl Ticker {
    fn next(state: &TransducerState) -> Relation {
        let taken = state.mem.relation("M").len();
        let id = state
            .sys
            .relation(SYS_ID)
            .iter()
            .next()
            .map(|t| t.to_string())
            .unwrap_or_default();
        [tuple!(format!("{}#{}", id, taken))].into_iter().collect()
    }
}

impl Transducer for Ticker {
    fn schema(&self) -> TransducerSchema {
        unary_schema()
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        Self::next(state)
    }

    fn add(&self, _relation: &str, state: &TransducerState) -> Relation {
        Self::next(state)
    }
}
