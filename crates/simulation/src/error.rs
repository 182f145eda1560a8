//! Error types for network simulation.

use crate::BufferError;
use thiserror::Error;
use transducer_core::TransducerError;
use transducer_types::{NodeId, SchemaError};

/// Errors raised while building or driving a transducer network.
///
/// Every variant is a defect of the caller, the scheduler or the program.
/// A failed step leaves the network exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The node is not part of the network.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// No initial input database was given for a node.
    #[error("no initial input for node {0}")]
    MissingInput(NodeId),

    /// A node's initial input does not satisfy the input schema.
    #[error("invalid initial input for node {node}: {source}")]
    InvalidInput {
        /// Node whose input is invalid.
        node: NodeId,
        /// The violation.
        #[source]
        source: SchemaError,
    },

    /// A delivery selection does not fit the node's buffer.
    #[error("invalid delivery to node {node}: {source}")]
    Buffer {
        /// Node the delivery was meant for.
        node: NodeId,
        /// The violation.
        #[source]
        source: BufferError,
    },

    /// The transducer step violated the schema.
    #[error("step at node {node} failed: {source}")]
    Transducer {
        /// Node that stepped.
        node: NodeId,
        /// The violation.
        #[source]
        source: TransducerError,
    },

    /// The relation is not a memory relation of the program.
    #[error("'{0}' is not a memory relation")]
    UnknownMemoryRelation(String),

    /// A random step was requested on a network without nodes.
    #[error("network has no nodes")]
    EmptyNetwork,
}
