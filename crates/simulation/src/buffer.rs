//! Per-node pending message buffers.

use crate::Delivery;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::trace;
use transducer_types::{Bag, Database, DatabaseSchema, Tuple};

/// Errors when consuming a delivery from a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The delivery names a relation that is not a message relation.
    #[error("'{0}' is not a message relation")]
    UnknownRelation(String),

    /// The delivery selects more copies than are pending.
    #[error("cannot deliver {requested} copies of {tuple} in '{relation}': {pending} pending")]
    Insufficient {
        /// Message relation.
        relation: String,
        /// Selected fact.
        tuple: Tuple,
        /// Copies selected.
        requested: usize,
        /// Copies pending.
        pending: usize,
    },
}

/// The pending messages of one node: one counted multiset per message
/// relation.
///
/// Copies only leave a buffer through [`take`](Self::take).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBuffer {
    relations: BTreeMap<String, Bag<Tuple>>,
}

impl MessageBuffer {
    /// Create an empty buffer for every relation of `schema`.
    pub fn new(schema: &DatabaseSchema) -> Self {
        Self {
            relations: schema
                .relations()
                .map(|r| (r.to_string(), Bag::new()))
                .collect(),
        }
    }

    /// Pending copies of `relation`.
    pub fn pending(&self, relation: &str) -> Option<&Bag<Tuple>> {
        self.relations.get(relation)
    }

    /// Iterate over `(relation, pending copies)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bag<Tuple>)> {
        self.relations.iter().map(|(r, b)| (r.as_str(), b))
    }

    /// Total number of pending copies across all relations.
    pub fn len(&self) -> usize {
        self.relations.values().map(Bag::len).sum()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.relations.values().all(Bag::is_empty)
    }

    /// Check that every selected copy is pending.
    pub fn check(&self, delivery: &Delivery) -> Result<(), BufferError> {
        for (relation, selected) in delivery.iter() {
            let pending = self
                .relations
                .get(relation)
                .ok_or_else(|| BufferError::UnknownRelation(relation.to_string()))?;

            for (tuple, requested) in selected.iter() {
                let available = pending.count(tuple);
                if requested > available {
                    return Err(BufferError::Insufficient {
                        relation: relation.to_string(),
                        tuple: tuple.clone(),
                        requested,
                        pending: available,
                    });
                }
            }
        }
        Ok(())
    }

    /// Remove exactly the selected copies.
    ///
    /// Either every selected copy is removed or, on error, none is.
    pub fn take(&mut self, delivery: &Delivery) -> Result<(), BufferError> {
        self.check(delivery)?;

        for (relation, selected) in delivery.iter() {
            let Some(pending) = self.relations.get_mut(relation) else {
                continue;
            };
            for (tuple, n) in selected.iter() {
                pending
                    .remove_many(tuple, n)
                    .map_err(|_| BufferError::Insufficient {
                        relation: relation.to_string(),
                        tuple: tuple.clone(),
                        requested: n,
                        pending: pending.count(tuple),
                    })?;
            }
            trace!(relation, taken = selected.len(), left = pending.len(), "Took from buffer");
        }
        Ok(())
    }

    /// Add one copy of every sent fact.
    ///
    /// Relations the buffer does not know are ignored; sent batches are
    /// schema-checked before they get here.
    pub fn push(&mut self, sent: &Database) {
        for (relation, tuples) in sent.iter() {
            if let Some(pending) = self.relations.get_mut(relation) {
                for tuple in tuples {
                    pending.insert(tuple.clone());
                }
            }
        }
    }

    /// Overwrite the pending copies of one relation.
    pub fn set(&mut self, relation: &str, bag: Bag<Tuple>) -> Result<(), BufferError> {
        let pending = self
            .relations
            .get_mut(relation)
            .ok_or_else(|| BufferError::UnknownRelation(relation.to_string()))?;
        *pending = bag;
        Ok(())
    }

    /// A uniformly random selection: per relation, a random sub-multiset of
    /// the pending copies (anywhere from none to all of them).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Delivery {
        let mut delivery = Delivery::new();
        for (relation, pending) in &self.relations {
            delivery.insert(relation.clone(), pending.sample(rng));
        }
        delivery
    }
}

impl fmt::Display for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (relation, bag)) in self.relations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", relation, bag)?;
        }
        write!(f, "}}")
    }
}
