//! Relational data model for transducer networks.
//!
//! Every node of a transducer network holds a few small relational databases
//! and exchanges facts with its neighbors. This crate defines those pieces
//! and nothing else:
//!
//! - [`Value`] / [`Tuple`]: opaque scalars and fixed-arity facts
//! - [`Database`] / [`DatabaseSchema`]: relation name to tuple set / arity
//! - [`TransducerSchema`] / [`TransducerState`]: the `in`, `out`, `msg`,
//!   `mem` (and implicit `sys`) databases of one node
//! - [`Bag`]: counted multiset used for pending message buffers
//! - [`Topology`]: the directed neighbor graph
//!
//! Schema validation lives in [`schema`]: [`database_satisfies_schema`] and
//! [`state_satisfies_schema`] are the boolean predicates; [`check_database`]
//! and [`check_state`] report the first violation.

mod bag;
mod database;
mod identifiers;
pub mod schema;
mod topology;
mod value;

pub use bag::{Bag, BagError};
pub use database::{Database, DatabaseSchema, Relation};
pub use identifiers::NodeId;
pub use schema::{
    check_database, check_state, database_satisfies_schema, state_satisfies_schema, SchemaError,
    StateComponent, TransducerSchema, TransducerState, SYS_ALL, SYS_ID,
};
pub use topology::{Topology, TopologyError};
pub use value::{Tuple, Value};
