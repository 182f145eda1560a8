//! Core transducer contract.
//!
//! A transducer program is a [`Transducer`]: a schema plus the `out`, `snd`,
//! `add` and `rem` queries. Running one step of any program goes through the
//! single algorithm in [`TransducerExt::step`], which maps a node's state and
//! a batch of delivered facts to a new state and a batch of facts to send.
//!
//! # Architecture
//!
//! ```text
//!   state, delivered
//!          │
//!          ▼
//!   state' = state with msg = delivered
//!          │
//!          ├── out(r, state')  → out[r] ∪= ...
//!          ├── add/rem(r, state') → mem[r] updated (conflicts cancel)
//!          └── snd(r, state')  → sent[r]
//!          │
//!          ▼
//!   StepOutput { state, sent }   (schema-checked)
//! ```
//!
//! The step is deterministic; all nondeterminism of a network run comes from
//! the runner's choice of node and delivery.

mod error;
mod message;
mod traits;

pub use error::TransducerError;
pub use message::StepOutput;
pub use traits::{Transducer, TransducerExt};

#[cfg(test)]
mod tests;
