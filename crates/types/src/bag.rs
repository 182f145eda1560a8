//! Counted multisets.
//!
//! Message buffers hold every pending copy of a fact independently: the same
//! fact may be sent several times, by one neighbor or by many, and each copy
//! is delivered (and consumed) on its own. A `Bag` is a map from element to
//! a positive count; elements with count zero are never stored.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// A counted multiset with deterministic (ordered) iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag<T: Ord> {
    counts: BTreeMap<T, usize>,
}

/// Errors from removing copies out of a [`Bag`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BagError {
    /// More copies were requested than the bag holds.
    #[error("requested {requested} copies but only {available} are pending")]
    Insufficient {
        /// Copies requested.
        requested: usize,
        /// Copies held.
        available: usize,
    },
}

impl<T: Ord> Default for Bag<T> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Clone> Bag<T> {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of `item`.
    pub fn insert(&mut self, item: T) {
        self.insert_many(item, 1);
    }

    /// Add `n` copies of `item`.
    pub fn insert_many(&mut self, item: T, n: usize) {
        if n > 0 {
            *self.counts.entry(item).or_insert(0) += n;
        }
    }

    /// Remove exactly `n` copies of `item`.
    ///
    /// Fails without modifying the bag if fewer than `n` copies are held.
    pub fn remove_many(&mut self, item: &T, n: usize) -> Result<(), BagError> {
        let available = self.count(item);
        if n > available {
            return Err(BagError::Insufficient {
                requested: n,
                available,
            });
        }
        if n == available {
            self.counts.remove(item);
        } else if let Some(count) = self.counts.get_mut(item) {
            *count -= n;
        }
        Ok(())
    }

    /// Number of copies of `item`.
    pub fn count(&self, item: &T) -> usize {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Total number of copies across all elements.
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    /// Whether the bag holds no copies.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct elements.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Iterate over `(element, count)` pairs in element order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> {
        self.counts.iter().map(|(t, n)| (t, *n))
    }

    /// The distinct elements, collapsing multiplicities.
    pub fn to_set(&self) -> BTreeSet<T> {
        self.counts.keys().cloned().collect()
    }

    /// Add every copy held by `other`.
    pub fn extend_from(&mut self, other: &Bag<T>) {
        for (item, n) in other.iter() {
            self.insert_many(item.clone(), n);
        }
    }

    /// Draw a uniformly random sub-multiset.
    ///
    /// The size is uniform in `[0, len]` (both ends inclusive); the copies are
    /// then chosen uniformly among all held copies, so an element with more
    /// pending copies is proportionally more likely to appear.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bag<T> {
        let copies: Vec<&T> = self
            .counts
            .iter()
            .flat_map(|(item, n)| std::iter::repeat(item).take(*n))
            .collect();
        let size = rng.gen_range(0..=copies.len());

        copies
            .choose_multiple(rng, size)
            .map(|item| (*item).clone())
            .collect()
    }
}

impl<T: Ord + Clone> FromIterator<T> for Bag<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut bag = Bag::new();
        for item in iter {
            bag.insert(item);
        }
        bag
    }
}

impl<T: Ord + fmt::Display> fmt::Display for Bag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (item, n)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", item, n)?;
        }
        write!(f, "}}")
    }
}
