//! Relations, database instances and database schemas.

use crate::Tuple;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A relation instance: a duplicate-free set of tuples.
pub type Relation = BTreeSet<Tuple>;

static EMPTY_RELATION: Relation = BTreeSet::new();

/// A database schema: relation name to arity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseSchema(BTreeMap<String, usize>);

impl DatabaseSchema {
    /// Create an empty schema (no relations).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relation with the given arity.
    pub fn with(mut self, relation: impl Into<String>, arity: usize) -> Self {
        self.0.insert(relation.into(), arity);
        self
    }

    /// Declared arity of a relation.
    pub fn arity(&self, relation: &str) -> Option<usize> {
        self.0.get(relation).copied()
    }

    /// Whether the schema declares the relation.
    pub fn contains(&self, relation: &str) -> bool {
        self.0.contains_key(relation)
    }

    /// Declared relation names, in order.
    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(relation, arity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(r, a)| (r.as_str(), *a))
    }

    /// Number of declared relations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no relations are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for DatabaseSchema {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(r, a)| (r.into(), a)).collect())
    }
}

/// A database instance: relation name to a set of tuples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database(BTreeMap<String, Relation>);

impl Database {
    /// Create a database with no relations at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database holding every relation of `schema`, all empty.
    pub fn empty(schema: &DatabaseSchema) -> Self {
        Self(
            schema
                .relations()
                .map(|r| (r.to_string(), Relation::new()))
                .collect(),
        )
    }

    /// Add (or replace) a relation.
    pub fn with<I>(mut self, relation: impl Into<String>, tuples: I) -> Self
    where
        I: IntoIterator<Item = Tuple>,
    {
        self.0.insert(relation.into(), tuples.into_iter().collect());
        self
    }

    /// The named relation; an undeclared name reads as the empty relation.
    ///
    /// Use [`get`](Self::get) to tell a missing relation from an empty one.
    pub fn relation(&self, name: &str) -> &Relation {
        self.0.get(name).unwrap_or(&EMPTY_RELATION)
    }

    /// The named relation, or `None` if the database does not hold it.
    pub fn get(&self, name: &str) -> Option<&Relation> {
        self.0.get(name)
    }

    /// Mutable access to the named relation, if present.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Relation> {
        self.0.get_mut(name)
    }

    /// Replace the named relation's contents.
    pub fn insert(&mut self, name: impl Into<String>, relation: Relation) {
        self.0.insert(name.into(), relation);
    }

    /// Whether the database holds the named relation.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Relation names held by this database.
    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(name, relation)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.0.iter().map(|(r, d)| (r.as_str(), d))
    }

    /// Per-relation union: every tuple of `other` is added to the matching
    /// relation here, creating relations that are missing.
    pub fn union_with(&mut self, other: &Database) {
        for (name, tuples) in &other.0 {
            self.0
                .entry(name.clone())
                .or_default()
                .extend(tuples.iter().cloned());
        }
    }

    /// Total number of facts across all relations.
    pub fn fact_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, Relation)> for Database {
    fn from_iter<I: IntoIterator<Item = (S, Relation)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(r, d)| (r.into(), d)).collect())
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, tuples)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {{", name)?;
            for (j, t) in tuples.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", t)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple;

    #[test]
    fn test_empty_database_matches_schema_relations() {
        let schema = DatabaseSchema::new().with("A", 1).with("B", 2);
        let db = Database::empty(&schema);

        assert_eq!(db.relations().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(db.fact_count(), 0);
    }

    #[test]
    fn test_undeclared_relation_reads_empty() {
        let db = Database::new().with("A", [tuple!(1)]);
        assert!(db.relation("Missing").is_empty());
        assert!(db.get("Missing").is_none());
        assert_eq!(db.relation("A").len(), 1);
    }

    #[test]
    fn test_union_with() {
        let mut left = Database::new().with("O", [tuple!(1)]);
        let right = Database::new()
            .with("O", [tuple!(1), tuple!(2)])
            .with("P", [tuple!(3)]);

        left.union_with(&right);

        assert_eq!(left.relation("O").len(), 2);
        assert_eq!(left.relation("P").len(), 1);
        assert_eq!(left.fact_count(), 3);
    }

    #[test]
    fn test_display() {
        let db = Database::new().with("O", [tuple!(2), tuple!(1)]);
        assert_eq!(db.to_string(), "{'O': {(1,), (2,)}}");
    }
}
