//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier.
///
/// Nodes are opaque names (`"X"`, `"Y"`, ...). The ordering is only used to
/// keep iteration over nodes deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_conversions() {
        let a = NodeId::from("X");
        let b = NodeId::new(String::from("X"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "X");
        assert_eq!(a.to_string(), "X");
    }

    #[test]
    fn test_node_id_ordering() {
        let mut ids = vec![NodeId::from("Y"), NodeId::from("X"), NodeId::from("A")];
        ids.sort();
        assert_eq!(
            ids,
            vec![NodeId::from("A"), NodeId::from("X"), NodeId::from("Y")]
        );
    }
}
