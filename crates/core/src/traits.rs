//! The transducer contract.

use crate::{StepOutput, TransducerError};
use transducer_types::{
    check_database, check_state, Database, Relation, TransducerSchema, TransducerState,
};
use tracing::trace;

/// A relational transducer program.
///
/// A program supplies its schema plus four queries over the node's state.
/// Every query receives `state'`: the node's stored state with `msg`
/// replaced by exactly the facts delivered in the current step (as sets, so
/// delivering three copies of a fact looks the same as delivering one).
///
/// Programs describe *what* to derive; how the derived facts update the
/// state is fixed by [`TransducerExt::step`] and cannot be overridden.
///
/// - **Deterministic**: same state and delivery, same result
/// - **No I/O**: queries only read `state'`
///
/// Reads through [`Database::relation`] are unchecked: a relation name the
/// schema does not declare (a typo, say) reads as empty and the step goes
/// on. Use [`Database::get`], which returns `None` for such a name, where a
/// missing relation should be caught.
///
/// # Example
///
/// ```
/// use transducer_core::Transducer;
/// use transducer_types::{DatabaseSchema, Relation, TransducerSchema, TransducerState};
///
/// /// T(x, y) :- R(x, y), x = y
/// struct Diagonal;
///
/// impl Transducer for Diagonal {
///     fn schema(&self) -> TransducerSchema {
///         TransducerSchema::new(
///             DatabaseSchema::new().with("R", 2),
///             DatabaseSchema::new().with("T", 2),
///             DatabaseSchema::new(),
///             DatabaseSchema::new(),
///         )
///     }
///
///     fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
///         state
///             .input
///             .relation("R")
///             .iter()
///             .filter(|t| t.get(0) == t.get(1))
///             .cloned()
///             .collect()
///     }
/// }
/// ```
pub trait Transducer {
    /// The program's fixed schema.
    fn schema(&self) -> TransducerSchema;

    /// Facts to union into output relation `relation` this step.
    fn out(&self, relation: &str, state: &TransducerState) -> Relation;

    /// Facts of message relation `relation` to send to every neighbor.
    fn snd(&self, _relation: &str, _state: &TransducerState) -> Relation {
        Relation::new()
    }

    /// Candidate facts to insert into memory relation `relation`.
    fn add(&self, _relation: &str, _state: &TransducerState) -> Relation {
        Relation::new()
    }

    /// Candidate facts to delete from memory relation `relation`.
    fn rem(&self, _relation: &str, _state: &TransducerState) -> Relation {
        Relation::new()
    }
}

/// The step algorithm shared by every [`Transducer`].
///
/// Implemented for all transducers; programs cannot provide their own.
pub trait TransducerExt: Transducer {
    /// Compute `(state, delivered) -> (new state, sent facts)`.
    ///
    /// 1. `state' = state` with `msg = delivered`
    /// 2. `out[r] = state.out[r] ∪ out(r, state')`
    /// 3. `mem[r] = (state.mem[r] ∪ (add − rem)) − (rem − add)`; a fact both
    ///    added and removed in one step is left as it was
    /// 4. `sent[r] = snd(r, state')`
    ///
    /// The returned state keeps `input`, `msg` and `sys` of `state`; only
    /// `output` and `mem` change. `delivered` must satisfy `schema.msg`.
    ///
    /// # Errors
    ///
    /// A schema violation in the delivery, the new state or the sent facts.
    /// These are defects of the caller or of the program and leave nothing
    /// modified.
    fn step(
        &self,
        state: &TransducerState,
        delivered: Database,
    ) -> Result<StepOutput, TransducerError> {
        let schema = self.schema();
        check_database(&delivered, &schema.msg).map_err(TransducerError::InvalidDelivery)?;

        let state_p = state.with_msg(delivered);

        let mut output = Database::new();
        for r in schema.output.relations() {
            let mut facts = state.output.relation(r).clone();
            facts.extend(self.out(r, &state_p));
            output.insert(r, facts);
        }

        let mut mem = Database::new();
        for r in schema.mem.relations() {
            let add = self.add(r, &state_p);
            let rem = self.rem(r, &state_p);
            let mut facts = state.mem.relation(r).clone();
            facts.extend(add.difference(&rem).cloned());
            for fact in rem.difference(&add) {
                facts.remove(fact);
            }
            trace!(
                relation = r,
                added = add.len(),
                removed = rem.len(),
                size = facts.len(),
                "Updated memory relation"
            );
            mem.insert(r, facts);
        }

        let mut sent = Database::new();
        for r in schema.msg.relations() {
            sent.insert(r, self.snd(r, &state_p));
        }

        let new_state = TransducerState {
            output,
            mem,
            ..state.clone()
        };

        check_state(&new_state, &schema).map_err(TransducerError::InvalidState)?;
        check_database(&sent, &schema.msg).map_err(TransducerError::InvalidSend)?;

        Ok(StepOutput {
            state: new_state,
            sent,
        })
    }
}

impl<T: Transducer + ?Sized> TransducerExt for T {}

impl<T: Transducer + ?Sized> Transducer for Box<T> {
    fn schema(&self) -> TransducerSchema {
        (**self).schema()
    }

    fn out(&self, relation: &str, state: &TransducerState) -> Relation {
        (**self).out(relation, state)
    }

    fn snd(&self, relation: &str, state: &TransducerState) -> Relation {
        (**self).snd(relation, state)
    }

    fn add(&self, relation: &str, state: &TransducerState) -> Relation {
        (**self).add(relation, state)
    }

    fn rem(&self, relation: &str, state: &TransducerState) -> Relation {
        (**self).rem(relation, state)
    }
}
