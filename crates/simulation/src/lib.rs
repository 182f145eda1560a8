//! Simulated asynchronous execution of relational transducer networks.
//!
//! A [`TransducerNetwork`] runs one transducer program on every node of a
//! directed [`Topology`](transducer_types::Topology). Asynchrony is
//! simulated by sequential interleaving: one `(node, delivery)` step at a
//! time, with every scheduling choice made explicitly (scripted steps) or by
//! an injected random source (random steps). Given the same seed, a run is
//! reproduced exactly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  TransducerNetwork                      │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Scheduler: scripted (node, Delivery)              │ │
//! │  │             or random node + random sub-multiset   │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  buffers[node] -= delivery                         │ │
//! │  │  states[node], sent = step(states[node], sets)     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  buffers[v] += sent   for every neighbor v         │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Buffers are counted multisets: each sent copy is independently
//! deliverable, in any order, at any later time.

mod buffer;
mod config;
mod delivery;
mod error;
mod network;
mod runner;

pub use buffer::{BufferError, MessageBuffer};
pub use config::{SimulationConfig, DEFAULT_SEED};
pub use delivery::{Delivery, StepRecord};
pub use error::NetworkError;
pub use network::{Configuration, TransducerNetwork};
pub use runner::SimulationStats;
