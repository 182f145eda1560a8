//! Delivery selections and executed-step records.

use std::collections::BTreeMap;
use std::fmt;
use transducer_types::{Bag, Database, DatabaseSchema, NodeId, Tuple};

/// Which pending copies to deliver to a node: message relation to a counted
/// multiset of facts.
///
/// Relations left out of a delivery are delivered empty. The transducer sees
/// each relation as a set, so the counts only matter for buffer bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    relations: BTreeMap<String, Bag<Tuple>>,
}

impl Delivery {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The no-op selection: run the node's logic without delivering anything.
    pub fn none() -> Self {
        Self::default()
    }

    /// Deliver one copy of each given tuple (repeated tuples deliver more copies).
    pub fn with<I>(mut self, relation: impl Into<String>, tuples: I) -> Self
    where
        I: IntoIterator<Item = Tuple>,
    {
        let bag = self.relations.entry(relation.into()).or_default();
        for tuple in tuples {
            bag.insert(tuple);
        }
        self
    }

    /// Deliver `copies` copies of `tuple`.
    pub fn with_copies(mut self, relation: impl Into<String>, tuple: Tuple, copies: usize) -> Self {
        self.relations
            .entry(relation.into())
            .or_default()
            .insert_many(tuple, copies);
        self
    }

    /// Set the whole selection for one relation.
    pub fn insert(&mut self, relation: impl Into<String>, bag: Bag<Tuple>) {
        self.relations.insert(relation.into(), bag);
    }

    /// Selected copies for `relation`, if the relation was named.
    pub fn relation(&self, relation: &str) -> Option<&Bag<Tuple>> {
        self.relations.get(relation)
    }

    /// Iterate over `(relation, selected copies)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bag<Tuple>)> {
        self.relations.iter().map(|(r, b)| (r.as_str(), b))
    }

    /// Total number of copies selected.
    pub fn fact_count(&self) -> usize {
        self.relations.values().map(Bag::len).sum()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.fact_count() == 0
    }

    /// The facts the transducer sees: every relation of `schema`, as sets.
    ///
    /// Relations not in `schema` are kept so that the transducer's own
    /// schema check reports them.
    pub fn to_database(&self, schema: &DatabaseSchema) -> Database {
        let mut db = Database::empty(schema);
        for (relation, bag) in &self.relations {
            db.insert(relation.clone(), bag.to_set());
        }
        db
    }
}

impl fmt::Display for Delivery {
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

/// A step that was executed: which node ran and what it was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// The node that stepped.
    pub node: NodeId,
    /// The copies consumed from its buffer.
    pub delivery: Delivery,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step({}, {})", self.node, self.delivery)
    }
}
