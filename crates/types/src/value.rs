//! Scalar values and fixed-arity tuples.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, totally ordered scalar stored in a tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// String value (also used for node identifiers in system relations).
    Str(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "'{}'", v),
        }
    }
}

/// A fact: an ordered, fixed-length sequence of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple(pub Vec<Value>);

impl Tuple {
    /// Create a tuple from its values.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Number of values in the tuple.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Value at the given position, if any.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// The tuple's values.
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        if self.0.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Build a [`Tuple`] from anything convertible into [`Value`].
///
/// ```
/// use transducer_types::{tuple, Value};
///
/// let t = tuple!(1, "a");
/// assert_eq!(t.arity(), 2);
/// assert_eq!(t.get(1), Some(&Value::from("a")));
/// ```
#[macro_export]
macro_rules! tuple {
    ($($value:expr),* $(,)?) => {
        $crate::Tuple::new(vec![$($crate::Value::from($value)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_macro_and_arity() {
        let t = tuple!(1, 2);
        assert_eq!(t.arity(), 2);
        assert_eq!(t.get(0), Some(&Value::Int(1)));

        let empty = tuple!();
        assert_eq!(empty.arity(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(tuple!(1).to_string(), "(1,)");
        assert_eq!(tuple!(1, "x").to_string(), "(1, 'x')");
    }

    #[test]
    fn test_ordering_is_total() {
        assert!(tuple!(1) < tuple!(2));
        assert!(Value::Int(5) < Value::from("a"));
    }
}
