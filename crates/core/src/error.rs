//! Error types for the step algorithm.

use thiserror::Error;
use transducer_types::SchemaError;

/// Schema violations detected while stepping a transducer.
///
/// All of these are defects (in the program or in whoever built the
/// delivery), never transient conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransducerError {
    /// The delivered facts do not satisfy the message schema.
    #[error("delivered messages violate the message schema: {0}")]
    InvalidDelivery(#[source] SchemaError),

    /// The state produced by the step does not satisfy the schema.
    #[error("step produced an invalid state: {0}")]
    InvalidState(#[source] SchemaError),

    /// The facts the program wants to send do not satisfy the message schema.
    #[error("sent messages violate the message schema: {0}")]
    InvalidSend(#[source] SchemaError),
}
