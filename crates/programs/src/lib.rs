//! Example transducer programs.
//!
//! Each program comes with an `example()` network and a `proof()`: two
//! scripted runs whose outputs are compared. Three of the programs are
//! counterexamples. Their rules are monotone (or their negated relations are
//! synchronized), yet two fair runs quiesce at different outputs.
//!
//! | Program | Rules | Proof outputs |
//! |---------|-------|---------------|
//! | [`ReflexivePairs`] | `T(x, y) :- R(x, y), x = y` | equal |
//! | [`MonotoneButNotConsistent`] | send `I` as `A` and `R`, `M += A`, `M -= R`, `O = M` | `{1, 2}` vs `{}` |
//! | [`SuperMonotoneButNotConsistent`] | `O(a, b) :- I(a), I(b), a != b` | `{(1, 2), (2, 1)}` vs `{}` |
//! | [`SynchronizedNegationsButNotConsistent`] | cache `A` and `R`, `O = A - R`, `R` synchronized | `{1, 2}` vs `{}` |

mod monotone;
mod reflexive_pairs;
mod super_monotone;
mod synchronized_negations;

pub use monotone::MonotoneButNotConsistent;
pub use reflexive_pairs::ReflexivePairs;
pub use super_monotone::SuperMonotoneButNotConsistent;
pub use synchronized_negations::SynchronizedNegationsButNotConsistent;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use transducer_core::Transducer;
use transducer_simulation::{NetworkError, SimulationConfig, TransducerNetwork};
use transducer_types::{tuple, Database, NodeId, Relation, Topology};

/// A network running one of the example programs behind a trait object.
pub type ProgramNetwork = TransducerNetwork<Box<dyn Transducer>>;

/// The outputs of a program's two scripted runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proof {
    /// Output of the first run.
    pub first: Database,
    /// Output of the second run.
    pub second: Database,
}

impl Proof {
    /// Whether both runs produced the same output.
    pub fn agrees(&self) -> bool {
        self.first == self.second
    }
}

/// Unknown program name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown program '{0}' (expected one of: {names})", names = Program::names().join(", "))]
pub struct UnknownProgram(pub String);

/// The example programs, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Program {
    ReflexivePairs,
    Monotone,
    SuperMonotone,
    SynchronizedNegations,
}

impl Program {
    /// Every example program.
    pub const ALL: [Program; 4] = [
        Program::ReflexivePairs,
        Program::Monotone,
        Program::SuperMonotone,
        Program::SynchronizedNegations,
    ];

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Program::ReflexivePairs => "reflexive-pairs",
            Program::Monotone => "monotone",
            Program::SuperMonotone => "super-monotone",
            Program::SynchronizedNegations => "synchronized-negations",
        }
    }

    /// Names of every example program.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.name()).collect()
    }

    /// The program's example network, scheduled with the given seed.
    pub fn network(self, config: SimulationConfig) -> Result<ProgramNetwork, NetworkError> {
        let program: Box<dyn Transducer> = match self {
            Program::ReflexivePairs => Box::new(ReflexivePairs),
            Program::Monotone => Box::new(MonotoneButNotConsistent),
            Program::SuperMonotone => Box::new(SuperMonotoneButNotConsistent),
            Program::SynchronizedNegations => Box::new(SynchronizedNegationsButNotConsistent),
        };
        let (topology, inputs) = match self {
            Program::ReflexivePairs => (ReflexivePairs::topology(), ReflexivePairs::inputs()),
            _ => (pair(), pair_inputs(&[1], &[2])),
        };
        TransducerNetwork::with_config(topology, program, inputs, config)
    }

    /// Run the program's two scripted runs.
    pub fn proof(self) -> Result<Proof, NetworkError> {
        match self {
            Program::ReflexivePairs => ReflexivePairs::proof(),
            Program::Monotone => MonotoneButNotConsistent::proof(),
            Program::SuperMonotone => SuperMonotoneButNotConsistent::proof(),
            Program::SynchronizedNegations => SynchronizedNegationsButNotConsistent::proof(),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Program {
    type Err = UnknownProgram;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownProgram(s.to_string()))
    }
}

/// Random steps taken after the scripted prefix of a proof run.
pub(crate) const RANDOM_SUFFIX: usize = 100;

// The helpers below mirror `transducer-test-helpers`, which is a
// dev-dependency only and cannot back library code.

pub(crate) fn node(name: &str) -> NodeId {
    NodeId::from(name)
}

pub(crate) fn unary(values: &[i64]) -> Relation {
    values.iter().map(|v| tuple!(*v)).collect()
}

/// `{X: {Y}, Y: {X}}`.
pub(crate) fn pair() -> Topology {
    Topology::symmetric([(node("X"), node("Y"))])
}

/// `I@X = x`, `I@Y = y`.
pub(crate) fn pair_inputs(x: &[i64], y: &[i64]) -> Vec<(NodeId, Database)> {
    vec![
        (node("X"), Database::new().with("I", unary(x))),
        (node("Y"), Database::new().with("I", unary(y))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_names_round_trip() {
        for program in Program::ALL {
            assert_eq!(program.name().parse::<Program>(), Ok(program));
            assert_eq!(program.to_string(), program.name());
        }
    }

    #[test]
    fn test_unknown_program_lists_choices() {
        let err = "nope".parse::<Program>().unwrap_err();
        assert_eq!(err, UnknownProgram("nope".to_string()));
        assert!(err.to_string().contains("super-monotone"));
    }

    #[test]
    fn test_every_program_builds_its_network() {
        for program in Program::ALL {
            let network = program.network(SimulationConfig::default()).unwrap();
            assert!(!network.nodes().is_empty());
        }
    }
}
