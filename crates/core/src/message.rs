//! Result of a single transducer step.

use transducer_types::{Database, TransducerState};

/// The outcome of [`TransducerExt::step`](crate::TransducerExt::step).
///
/// The runner stores `state` back into the node and hands `sent` to every
/// neighbor of the node; the transducer itself never addresses anyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    /// The node's new state.
    pub state: TransducerState,

    /// Facts sent this step, per message relation. Satisfies `schema.msg`.
    pub sent: Database,
}

impl StepOutput {
    /// Total number of facts sent across all message relations.
    pub fn sent_count(&self) -> usize {
        self.sent.fact_count()
    }

    /// Whether nothing was sent.
    pub fn is_silent(&self) -> bool {
        self.sent_count() == 0
    }
}
