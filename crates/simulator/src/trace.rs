//! Serializable snapshots of a network and traces of random runs.

use crate::QuietWindow;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use transducer_core::Transducer;
use transducer_simulation::{
    Delivery, MessageBuffer, NetworkError, StepRecord, TransducerNetwork,
};
use transducer_types::{Bag, Database, NodeId, TransducerState, Tuple};

/// Relation name to its facts, in order.
pub type Facts = BTreeMap<String, Vec<Tuple>>;

/// Relation name to its pending copies, as `(fact, copies)` pairs.
pub type Counted = BTreeMap<String, Vec<(Tuple, usize)>>;

fn facts(db: &Database) -> Facts {
    db.iter()
        .map(|(name, relation)| (name.to_string(), relation.iter().cloned().collect()))
        .collect()
}

fn counted<'a>(relations: impl Iterator<Item = (&'a str, &'a Bag<Tuple>)>) -> Counted {
    relations
        .map(|(name, bag)| {
            let copies = bag.iter().map(|(t, n)| (t.clone(), n)).collect();
            (name.to_string(), copies)
        })
        .collect()
}

/// One node's state and pending messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    /// Input database.
    #[serde(rename = "in")]
    pub input: Facts,
    /// Local output.
    #[serde(rename = "out")]
    pub output: Facts,
    /// Local memory.
    pub mem: Facts,
    /// Pending message copies.
    pub buf: Counted,
}

impl NodeSnapshot {
    fn capture(state: &TransducerState, buffer: &MessageBuffer) -> Self {
        Self {
            input: facts(&state.input),
            output: facts(&state.output),
            mem: facts(&state.mem),
            buf: counted(buffer.iter()),
        }
    }
}

/// Every node's state and pending messages at one point of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Per-node contents, by node identifier.
    pub nodes: BTreeMap<NodeId, NodeSnapshot>,
}

impl Snapshot {
    /// Capture the current configuration of `network`.
    pub fn capture<T, R>(network: &TransducerNetwork<T, R>) -> Self {
        let configuration = network.configuration();
        let nodes = configuration
            .states
            .iter()
            .filter_map(|(id, state)| {
                let buffer = configuration.buffers.get(id)?;
                Some((id.clone(), NodeSnapshot::capture(state, buffer)))
            })
            .collect();
        Self { nodes }
    }
}

/// A step as recorded in a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    /// The node that stepped.
    pub node: NodeId,
    /// The copies it was delivered.
    pub delivery: Counted,
}

impl From<&StepRecord> for TraceStep {
    fn from(record: &StepRecord) -> Self {
        Self {
            node: record.node.clone(),
            delivery: counted(record.delivery.iter()),
        }
    }
}

impl From<&TraceStep> for Delivery {
    fn from(step: &TraceStep) -> Self {
        let mut delivery = Delivery::new();
        for (relation, copies) in &step.delivery {
            let bag = copies.iter().fold(Bag::new(), |mut bag, (t, n)| {
                bag.insert_many(t.clone(), *n);
                bag
            });
            delivery.insert(relation.clone(), bag);
        }
        delivery
    }
}

/// The snapshot taken before a step, and the step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Configuration before the step.
    pub snapshot: Snapshot,
    /// The step taken from it.
    pub step: TraceStep,
}

/// A random run, step by step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    /// Steps in the order they were taken.
    pub entries: Vec<TraceEntry>,
    /// Configuration after the last step.
    pub last: Snapshot,
    /// Whether the run ended on a completed quiet window rather than at the
    /// step bound.
    pub quiesced: bool,
}

impl Trace {
    /// Take random steps on `network` until a quiet window of `quiet_steps`
    /// completes (see [`settle`](crate::settle)) or `max_steps` steps were
    /// taken, recording a snapshot before each one.
    pub fn record<T, R>(
        network: &mut TransducerNetwork<T, R>,
        max_steps: usize,
        quiet_steps: usize,
    ) -> Result<Self, NetworkError>
    where
        T: Transducer,
        R: Rng,
    {
        let mut entries = Vec::new();
        let mut window = QuietWindow::new(network, quiet_steps);
        let mut quiesced = false;

        for _ in 0..max_steps {
            let snapshot = Snapshot::capture(network);
            let record = network.random_step()?;
            entries.push(TraceEntry {
                snapshot,
                step: TraceStep::from(&record),
            });

            if window.observe(&record, network.out()) {
                quiesced = true;
                break;
            }
        }

        Ok(Self {
            entries,
            last: Snapshot::capture(network),
            quiesced,
        })
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no step was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replay the recorded steps on a fresh network, as scripted steps.
    pub fn replay<T, R>(&self, network: &mut TransducerNetwork<T, R>) -> Result<(), NetworkError>
    where
        T: Transducer,
        R: Rng,
    {
        for entry in &self.entries {
            network.step(&entry.step.node, Delivery::from(&entry.step))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transducer_simulation::SimulationConfig;
    use transducer_test_helpers::{node, pair, pair_inputs, Flood, Ticker};
    use transducer_types::tuple;

    fn flood(seed: u64) -> TransducerNetwork<Flood> {
        let config = SimulationConfig::new().with_seed(seed);
        TransducerNetwork::with_config(pair(), Flood, pair_inputs(&[1], &[2]), config).unwrap()
    }

    #[test]
    fn test_snapshot_contents() {
        let mut network = flood(1);
        network.step(&node("X"), Delivery::none()).unwrap();

        let snapshot = Snapshot::capture(&network);
        let x = &snapshot.nodes[&node("X")];
        let y = &snapshot.nodes[&node("Y")];

        assert_eq!(x.input["I"], vec![tuple!(1)]);
        assert_eq!(x.output["O"], vec![tuple!(1)]);
        assert_eq!(y.buf["A"], vec![(tuple!(1), 1)]);
        assert!(x.buf["A"].is_empty());
    }

    #[test]
    fn test_snapshot_json_uses_component_names() {
        let network = flood(1);
        let json = serde_json::to_value(Snapshot::capture(&network)).unwrap();

        let x = &json["nodes"]["X"];
        assert_eq!(x["in"]["I"], serde_json::json!([[1]]));
        assert!(x.get("out").is_some());
        assert!(x.get("buf").is_some());
    }

    #[test]
    fn test_record_stops_at_quiescence() {
        let mut network = flood(4);
        let trace = Trace::record(&mut network, 1_000, 10).unwrap();

        assert!(trace.quiesced);
        assert_eq!(trace.len() as u64, network.stats().random_steps);
        assert_eq!(trace.last, Snapshot::capture(&network));
    }

    #[test]
    fn test_record_respects_bound() {
        let config = SimulationConfig::new().with_seed(2);
        let mut network =
            TransducerNetwork::with_config(pair(), Ticker, pair_inputs(&[1], &[2]), config)
                .unwrap();

        let trace = Trace::record(&mut network, 10, 3).unwrap();

        assert!(!trace.quiesced);
        assert_eq!(trace.len(), 10);
    }

    #[test]
    fn test_replay_reproduces_run() {
        let mut original = flood(9);
        let trace = Trace::record(&mut original, 40, 5).unwrap();

        let mut replayed = flood(0);
        trace.replay(&mut replayed).unwrap();

        assert_eq!(Snapshot::capture(&replayed), trace.last);
    }
}
