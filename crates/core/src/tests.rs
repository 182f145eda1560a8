use crate::{Transducer, TransducerError, TransducerExt};
use tracing_test::traced_test;
use transducer_types::{
    state_satisfies_schema, tuple, Database, DatabaseSchema, NodeId, Relation, SchemaError,
    TransducerSchema, TransducerState,
};

/// Sends its input as both A and R, inserts delivered A into M, deletes
/// delivered R from M, and outputs M.
struct AddRemove;

impl Transducer for AddRemove {
    fn schema(&self) -> TransducerSchema {
        TransducerSchema::new(
            DatabaseSchema::new().with("I", 1),
            DatabaseSchema::new().with("O", 1),
            DatabaseSchema::new().with("A", 1).with("R", 1),
            DatabaseSchema::new().with("M", 1),
        )
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.mem.relation("M").clone()
    }

    fn snd(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.input.relation("I").clone()
    }

    fn add(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation("A").clone()
    }

    fn rem(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation("R").clone()
    }
}

/// Outputs nothing, sends nothing, remembers nothing.
struct Constant;

impl Transducer for Constant {
    fn schema(&self) -> TransducerSchema {
        TransducerSchema::new(
            DatabaseSchema::new().with("I", 1),
            DatabaseSchema::new().with("O", 1),
            DatabaseSchema::new().with("A", 1),
            DatabaseSchema::new().with("M", 1),
        )
    }

    fn out(&self, _relation: &str, _state: &TransducerState) -> Relation {
        Relation::new()
    }
}

/// Sends binary tuples over a unary message relation.
struct WrongArity;

impl Transducer for WrongArity {
    fn schema(&self) -> TransducerSchema {
        TransducerSchema::new(
            DatabaseSchema::new(),
            DatabaseSchema::new(),
            DatabaseSchema::new().with("A", 1),
            DatabaseSchema::new(),
        )
    }

    fn out(&self, _relation: &str, _state: &TransducerState) -> Relation {
        Relation::new()
    }

    fn snd(&self, _relation: &str, _state: &TransducerState) -> Relation {
        [tuple!(1, 2)].into_iter().collect()
    }
}

fn initial_state<T: Transducer>(program: &T, input: Database) -> TransducerState {
    let nodes = [NodeId::from("X"), NodeId::from("Y")];
    TransducerState::initial(&nodes[0], &nodes, &program.schema(), input)
}

fn rel(values: &[i64]) -> Relation {
    values.iter().map(|v| tuple!(*v)).collect()
}

fn msgs(a: &[i64], r: &[i64]) -> Database {
    Database::new()
        .with("A", a.iter().map(|v| tuple!(*v)))
        .with("R", r.iter().map(|v| tuple!(*v)))
}

#[traced_test]
#[test]
fn test_step_sends_and_updates_memory() {
    let program = AddRemove;
    let state = initial_state(&program, Database::new().with("I", [tuple!(1)]));

    let result = program.step(&state, msgs(&[2], &[])).unwrap();

    assert_eq!(result.sent.relation("A"), &rel(&[1]));
    assert_eq!(result.sent.relation("R"), &rel(&[1]));
    assert!(result.state.mem.relation("M").contains(&tuple!(2)));
    // out reads the memory as it was before the step.
    assert!(result.state.output.relation("O").is_empty());

    let result = program.step(&result.state, msgs(&[], &[])).unwrap();
    assert!(result.state.output.relation("O").contains(&tuple!(2)));
}

#[test]
fn test_add_and_remove_of_same_fact_cancel() {
    let program = AddRemove;
    let mut state = initial_state(&program, Database::new().with("I", [tuple!(1)]));
    state.mem = Database::new().with("M", [tuple!(5)]);

    // 3 is both added and removed: no-op. 5 is both added and removed: stays.
    let result = program.step(&state, msgs(&[3, 5], &[3, 5])).unwrap();
    assert_eq!(result.state.mem.relation("M"), &rel(&[5]));

    // Removal alone deletes.
    let result = program.step(&result.state, msgs(&[], &[5])).unwrap();
    assert!(result.state.mem.relation("M").is_empty());
}

#[test]
fn test_output_never_shrinks() {
    let program = AddRemove;
    let mut state = initial_state(&program, Database::new().with("I", [tuple!(1)]));
    state.output = Database::new().with("O", [tuple!(9)]);

    let result = program.step(&state, msgs(&[], &[])).unwrap();
    assert!(result.state.output.relation("O").contains(&tuple!(9)));
}

#[test]
fn test_step_keeps_input_msg_and_sys() {
    let program = AddRemove;
    let state = initial_state(&program, Database::new().with("I", [tuple!(1)]));

    let result = program.step(&state, msgs(&[4], &[])).unwrap();

    assert_eq!(result.state.input, state.input);
    assert_eq!(result.state.msg, state.msg);
    assert_eq!(result.state.sys, state.sys);
    assert!(state_satisfies_schema(&result.state, &program.schema()));
}

#[test]
fn test_duplicate_deliveries_collapse() {
    let program = AddRemove;
    let state = initial_state(&program, Database::new().with("I", []));

    // A delivery is a set: one copy or many are indistinguishable.
    let once = program.step(&state, msgs(&[2], &[])).unwrap();
    let twice = program.step(&state, msgs(&[2, 2], &[])).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_noop_step_of_constant_program_is_idempotent() {
    let program = Constant;
    let state = initial_state(&program, Database::new().with("I", [tuple!(1)]));
    let empty = Database::empty(&program.schema().msg);

    let result = program.step(&state, empty).unwrap();

    assert_eq!(result.state, state);
    assert!(result.is_silent());
}

#[test]
fn test_invalid_delivery_is_rejected() {
    let program = AddRemove;
    let state = initial_state(&program, Database::new().with("I", []));

    let missing_relation = Database::new().with("A", [tuple!(1)]);
    assert!(matches!(
        program.step(&state, missing_relation),
        Err(TransducerError::InvalidDelivery(
            SchemaError::RelationMismatch { .. }
        ))
    ));

    let wrong_arity = Database::new().with("A", [tuple!(1, 1)]).with("R", []);
    assert!(matches!(
        program.step(&state, wrong_arity),
        Err(TransducerError::InvalidDelivery(
            SchemaError::ArityMismatch { .. }
        ))
    ));
}

#[test]
fn test_invalid_send_is_rejected() {
    let program = WrongArity;
    let state = initial_state(&program, Database::new());
    let empty = Database::empty(&program.schema().msg);

    let err = program.step(&state, empty).unwrap_err();
    assert!(matches!(err, TransducerError::InvalidSend(_)));
}

#[test]
fn test_boxed_program_steps_like_the_original() {
    let boxed: Box<dyn Transducer> = Box::new(AddRemove);
    let state = initial_state(&AddRemove, Database::new().with("I", [tuple!(1)]));

    assert_eq!(
        boxed.step(&state, msgs(&[2], &[])),
        AddRemove.step(&state, msgs(&[2], &[]))
    );
}

/// Forwards delivered `A` facts but misspells the relation name.
struct Misspelled;

impl Transducer for Misspelled {
    fn schema(&self) -> TransducerSchema {
        AddRemove.schema()
    }

    fn out(&self, _relation: &str, state: &TransducerState) -> Relation {
        state.msg.relation("a").clone()
    }
}

#[test]
fn test_misspelled_relation_reads_empty_but_get_reports_it() {
    let program = Misspelled;
    let state = initial_state(&program, Database::new().with("I", [tuple!(1)]));

    let result = program.step(&state, msgs(&[5], &[])).unwrap();

    assert!(result.state.output.relation("O").is_empty());
    let delivered = state.with_msg(msgs(&[5], &[]));
    assert_eq!(delivered.msg.get("a"), None);
    assert_eq!(delivered.msg.get("A"), Some(&rel(&[5])));
}
