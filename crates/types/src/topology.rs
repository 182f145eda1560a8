//! Directed neighbor graphs.

use crate::NodeId;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// A directed network: an edge `u -> v` means facts sent by `u` may be
/// delivered to `v`.
///
/// The node set is the domain of the neighbor map. A node may have an empty
/// neighbor set (it computes but never sends to anyone).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    neighbors: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

/// Errors that can occur when validating a topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// A neighbor is not itself a node of the network.
    #[error("node {node} lists unknown neighbor {neighbor}")]
    UnknownNeighbor {
        /// Node whose neighbor set is invalid.
        node: NodeId,
        /// The neighbor missing from the node set.
        neighbor: NodeId,
    },
}

impl Topology {
    /// Create a topology from a node -> neighbor-set mapping.
    pub fn from_neighbors<I, N>(neighbors: I) -> Result<Self, TopologyError>
    where
        I: IntoIterator<Item = (NodeId, N)>,
        N: IntoIterator<Item = NodeId>,
    {
        let neighbors: BTreeMap<NodeId, BTreeSet<NodeId>> = neighbors
            .into_iter()
            .map(|(node, ns)| (node, ns.into_iter().collect()))
            .collect();

        for (node, ns) in &neighbors {
            if let Some(neighbor) = ns.iter().find(|n| !neighbors.contains_key(*n)) {
                return Err(TopologyError::UnknownNeighbor {
                    node: node.clone(),
                    neighbor: neighbor.clone(),
                });
            }
        }

        Ok(Self { neighbors })
    }

    /// Create a topology from directed edges. Every endpoint becomes a node.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut neighbors: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
        for (from, to) in edges {
            neighbors.entry(to.clone()).or_default();
            neighbors.entry(from).or_default().insert(to);
        }
        Self { neighbors }
    }

    /// Create a topology where every edge is present in both directions.
    pub fn symmetric<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        Self::from_edges(
            edges
                .into_iter()
                .flat_map(|(a, b)| [(a.clone(), b.clone()), (b, a)]),
        )
    }

    /// Create a complete graph: every node neighbors every other node.
    pub fn complete<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = NodeId>,
    {
        let nodes: BTreeSet<NodeId> = nodes.into_iter().collect();
        let neighbors = nodes
            .iter()
            .map(|node| {
                let others = nodes.iter().filter(|n| *n != node).cloned().collect();
                (node.clone(), others)
            })
            .collect();
        Self { neighbors }
    }

    /// All nodes, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.neighbors.keys()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the topology has no nodes.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Whether `node` is part of the network.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.neighbors.contains_key(node)
    }

    /// Neighbors of `node`, or `None` for an unknown node.
    pub fn neighbors(&self, node: &NodeId) -> Option<&BTreeSet<NodeId>> {
        self.neighbors.get(node)
    }

    /// Whether `to` receives what `from` sends.
    pub fn has_edge(&self, from: &NodeId, to: &NodeId) -> bool {
        self.neighbors
            .get(from)
            .is_some_and(|ns| ns.contains(to))
    }

    /// Whether every edge has its reverse edge.
    pub fn is_symmetric(&self) -> bool {
        self.neighbors
            .iter()
            .all(|(from, ns)| ns.iter().all(|to| self.has_edge(to, from)))
    }
}
