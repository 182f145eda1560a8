//! Network topology, node states and message buffers.

use crate::{
    Delivery, MessageBuffer, NetworkError, SimulationConfig, SimulationStats, StepRecord,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};
use transducer_core::{StepOutput, Transducer, TransducerExt};
use transducer_types::{
    check_database, database_satisfies_schema, Database, NodeId, Relation, Topology,
    TransducerSchema, TransducerState,
};

/// A read-only view of every node's state and pending buffer.
#[derive(Debug, Clone, Copy)]
pub struct Configuration<'a> {
    /// Per-node transducer state.
    pub states: &'a BTreeMap<NodeId, TransducerState>,
    /// Per-node pending messages.
    pub buffers: &'a BTreeMap<NodeId, MessageBuffer>,
}

/// A network of nodes all running the same transducer program.
///
/// The network owns one state and one message buffer per node, keyed by
/// node identifier. Steps are processed one at a time:
///
/// 1. the chosen copies are removed from the node's buffer,
/// 2. the transducer steps on the delivered facts (as sets),
/// 3. every fact it sends is added, once, to each neighbor's buffer.
///
/// The only source of nondeterminism is the scheduler: which node steps and
/// which pending copies it receives. Scripted steps choose both explicitly
/// ([`step`](Self::step)); random steps draw them from `R`.
pub struct TransducerNetwork<T, R = ChaCha8Rng> {
    pub(crate) topology: Topology,
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) transducer: T,
    pub(crate) schema: TransducerSchema,
    pub(crate) states: BTreeMap<NodeId, TransducerState>,
    pub(crate) buffers: BTreeMap<NodeId, MessageBuffer>,
    pub(crate) rng: R,
    pub(crate) stats: SimulationStats,
}

impl<T: Transducer> TransducerNetwork<T, ChaCha8Rng> {
    /// Build a network with the default configuration.
    ///
    /// `inputs` must hold exactly one input database per node.
    pub fn new<I>(topology: Topology, transducer: T, inputs: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = (NodeId, Database)>,
    {
        Self::with_config(topology, transducer, inputs, SimulationConfig::default())
    }

    /// Build a network whose scheduler is seeded from `config`.
    pub fn with_config<I>(
        topology: Topology,
        transducer: T,
        inputs: I,
        config: SimulationConfig,
    ) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = (NodeId, Database)>,
    {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(topology, transducer, inputs, rng)
    }
}

impl<T: Transducer, R: Rng> TransducerNetwork<T, R> {
    /// Build a network that schedules random steps with `rng`.
    pub fn with_rng<I>(
        topology: Topology,
        transducer: T,
        inputs: I,
        rng: R,
    ) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = (NodeId, Database)>,
    {
        let schema = transducer.schema();
        let nodes: Vec<NodeId> = topology.nodes().cloned().collect();
        let mut inputs: BTreeMap<NodeId, Database> = inputs.into_iter().collect();

        if let Some(extra) = inputs.keys().find(|n| !topology.contains(n)) {
            return Err(NetworkError::UnknownNode(extra.clone()));
        }

        let mut states = BTreeMap::new();
        let mut buffers = BTreeMap::new();
        for node in &nodes {
            let input = inputs
                .remove(node)
                .ok_or_else(|| NetworkError::MissingInput(node.clone()))?;
            check_database(&input, &schema.input).map_err(|source| {
                NetworkError::InvalidInput {
                    node: node.clone(),
                    source,
                }
            })?;

            let state = TransducerState::initial(node, &nodes, &schema, input);
            states.insert(node.clone(), state);
            buffers.insert(node.clone(), MessageBuffer::new(&schema.msg));
        }

        debug!(nodes = nodes.len(), "Built transducer network");

        Ok(Self {
            topology,
            nodes,
            transducer,
            schema,
            states,
            buffers,
            rng,
            stats: SimulationStats::default(),
        })
    }

    /// Step `node` with an explicit delivery selection.
    ///
    /// The selection may be empty: the node then runs its logic against no
    /// new facts. Selected copies must all be pending.
    ///
    /// # Errors
    ///
    /// An unknown node, a selection that overdraws the buffer or names a
    /// non-message relation, or a schema violation by the program. On error
    /// neither states nor buffers change.
    pub fn step(&mut self, node: &NodeId, delivery: Delivery) -> Result<StepRecord, NetworkError> {
        let (Some(state), Some(buffer)) = (self.states.get(node), self.buffers.get(node)) else {
            return Err(NetworkError::UnknownNode(node.clone()));
        };
        buffer
            .check(&delivery)
            .map_err(|source| NetworkError::Buffer {
                node: node.clone(),
                source,
            })?;

        let delivered = delivery.to_database(&self.schema.msg);
        let StepOutput { state, sent } = self
            .transducer
            .step(state, delivered)
            .map_err(|source| NetworkError::Transducer {
                node: node.clone(),
                source,
            })?;

        if let Some(buffer) = self.buffers.get_mut(node) {
            buffer
                .take(&delivery)
                .map_err(|source| NetworkError::Buffer {
                    node: node.clone(),
                    source,
                })?;
        }
        self.states.insert(node.clone(), state);

        let neighbors = self.topology.neighbors(node).into_iter().flatten();
        for neighbor in neighbors {
            if let Some(buffer) = self.buffers.get_mut(neighbor) {
                buffer.push(&sent);
            }
        }

        let delivered_count = delivery.fact_count();
        let sent_count = sent.fact_count();
        self.stats.steps += 1;
        self.stats.facts_delivered += delivered_count as u64;
        self.stats.facts_sent += sent_count as u64;

        debug!(
            node = %node,
            delivered = delivered_count,
            sent = sent_count,
            "Stepped node"
        );

        Ok(StepRecord {
            node: node.clone(),
            delivery,
        })
    }

    /// The externally visible output: the per-relation union of every
    /// node's local output.
    pub fn out(&self) -> Database {
        let mut out = Database::empty(&self.schema.output);
        for state in self.states.values() {
            out.union_with(&state.output);
        }
        debug_assert!(database_satisfies_schema(&out, &self.schema.output));
        out
    }

    /// Replace every node's copy of memory relation `relation` with the
    /// union of all nodes' copies.
    ///
    /// This bypasses the transducer and the buffers entirely.
    pub fn sync_mem_relation(&mut self, relation: &str) -> Result<(), NetworkError> {
        if !self.schema.mem.contains(relation) {
            return Err(NetworkError::UnknownMemoryRelation(relation.to_string()));
        }

        let union: Relation = self
            .states
            .values()
            .flat_map(|s| s.mem.relation(relation).iter().cloned())
            .collect();

        for state in self.states.values_mut() {
            state.mem.insert(relation, union.clone());
        }
        self.stats.mem_syncs += 1;

        info!(relation, facts = union.len(), "Synchronized memory relation");
        Ok(())
    }
}

impl<T, R> TransducerNetwork<T, R> {
    /// Snapshot of all states and buffers.
    pub fn configuration(&self) -> Configuration<'_> {
        Configuration {
            states: &self.states,
            buffers: &self.buffers,
        }
    }

    /// The network's topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// All nodes, in order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The program every node runs.
    pub fn transducer(&self) -> &T {
        &self.transducer
    }

    /// The program's schema.
    pub fn schema(&self) -> &TransducerSchema {
        &self.schema
    }

    /// State of `node`.
    pub fn state(&self, node: &NodeId) -> Option<&TransducerState> {
        self.states.get(node)
    }

    /// Pending messages of `node`.
    pub fn buffer(&self, node: &NodeId) -> Option<&MessageBuffer> {
        self.buffers.get(node)
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }
}

impl<T, R> fmt::Display for TransducerNetwork<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (node, state)) in self.states.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Node '{}'", node)?;
            for (name, db) in [("in", &state.input), ("out", &state.output), ("mem", &state.mem)] {
                writeln!(f, "  {}", name)?;
                for (relation, tuples) in db.iter() {
                    write!(f, "    '{}': {{", relation)?;
                    for (j, t) in tuples.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", t)?;
                    }
                    writeln!(f, "}}")?;
                }
            }
            write!(f, "  buf")?;
            if let Some(buffer) = self.buffers.get(node) {
                for (relation, pending) in buffer.iter() {
                    write!(f, "\n    '{}': {}", relation, pending)?;
                }
            }
        }
        Ok(())
    }
}
