//! Transducer schemas, transducer states and schema validation.
//!
//! A transducer schema declares four database schemas:
//!
//! - `input`: external input, read-only to the transducer
//! - `output`: externally visible output, only ever grows
//! - `msg`: message relations, shared by sent and received facts
//! - `mem`: persistent local memory
//!
//! A database *satisfies* a schema when it holds exactly the declared
//! relations and every tuple has its relation's declared arity.

use crate::{Database, DatabaseSchema, NodeId, Tuple, Value};
use std::fmt;
use thiserror::Error;

/// Name of the system relation holding the local node identifier.
pub const SYS_ID: &str = "Id";

/// Name of the system relation holding every node identifier.
pub const SYS_ALL: &str = "All";

/// The four declared database schemas of a transducer program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransducerSchema {
    /// External input relations.
    pub input: DatabaseSchema,
    /// Output relations.
    pub output: DatabaseSchema,
    /// Message relations.
    pub msg: DatabaseSchema,
    /// Memory relations.
    pub mem: DatabaseSchema,
}

impl TransducerSchema {
    /// Create a transducer schema from its four components.
    pub fn new(
        input: DatabaseSchema,
        output: DatabaseSchema,
        msg: DatabaseSchema,
        mem: DatabaseSchema,
    ) -> Self {
        Self {
            input,
            output,
            msg,
            mem,
        }
    }

    /// The implicit schema of the system database: `{All: 1, Id: 1}`.
    pub fn sys() -> DatabaseSchema {
        DatabaseSchema::new().with(SYS_ALL, 1).with(SYS_ID, 1)
    }
}

/// One node's relational state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransducerState {
    /// External input.
    pub input: Database,
    /// Local output.
    pub output: Database,
    /// Facts delivered in the current step only.
    pub msg: Database,
    /// Local memory.
    pub mem: Database,
    /// System relations `Id` and `All`, injected by the network.
    pub sys: Database,
}

impl TransducerState {
    /// Build the initial state of `node`: the given input, empty output,
    /// message and memory databases, and the system relations for `nodes`.
    pub fn initial<'a>(
        node: &NodeId,
        nodes: impl IntoIterator<Item = &'a NodeId>,
        schema: &TransducerSchema,
        input: Database,
    ) -> Self {
        let sys = Database::new()
            .with(SYS_ID, [node_tuple(node)])
            .with(SYS_ALL, nodes.into_iter().map(node_tuple));

        Self {
            input,
            output: Database::empty(&schema.output),
            msg: Database::empty(&schema.msg),
            mem: Database::empty(&schema.mem),
            sys,
        }
    }

    /// The state with `msg` replaced by the given delivered facts.
    pub fn with_msg(&self, msg: Database) -> Self {
        Self {
            msg,
            ..self.clone()
        }
    }
}

fn node_tuple(node: &NodeId) -> Tuple {
    Tuple::new(vec![Value::Str(node.as_str().to_string())])
}

/// One of the five databases of a transducer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateComponent {
    /// The `input` database.
    Input,
    /// The `output` database.
    Output,
    /// The `msg` database.
    Msg,
    /// The `mem` database.
    Mem,
    /// The `sys` database.
    Sys,
}

impl fmt::Display for StateComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateComponent::Input => "in",
            StateComponent::Output => "out",
            StateComponent::Msg => "msg",
            StateComponent::Mem => "mem",
            StateComponent::Sys => "sys",
        };
        f.write_str(name)
    }
}

/// Reasons a database or state fails to satisfy its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The database does not hold exactly the declared relations.
    #[error("relation set mismatch: expected {expected:?}, found {found:?}")]
    RelationMismatch {
        /// Relations declared by the schema.
        expected: Vec<String>,
        /// Relations held by the database.
        found: Vec<String>,
    },

    /// A tuple's length differs from its relation's arity.
    #[error("tuple {tuple} in relation '{relation}' has arity {found}, expected {expected}")]
    ArityMismatch {
        /// Offending relation.
        relation: String,
        /// Offending tuple.
        tuple: Tuple,
        /// Declared arity.
        expected: usize,
        /// Actual tuple length.
        found: usize,
    },

    /// A state component failed validation.
    #[error("{component} database: {source}")]
    Component {
        /// Which database of the state was invalid.
        component: StateComponent,
        /// The underlying violation.
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    fn in_component(self, component: StateComponent) -> Self {
        SchemaError::Component {
            component,
            source: Box::new(self),
        }
    }
}

/// Check that `db` satisfies `schema`, naming the first violation.
pub fn check_database(db: &Database, schema: &DatabaseSchema) -> Result<(), SchemaError> {
    if !db.relations().eq(schema.relations()) {
        return Err(SchemaError::RelationMismatch {
            expected: schema.relations().map(str::to_string).collect(),
            found: db.relations().map(str::to_string).collect(),
        });
    }

    for (relation, arity) in schema.iter() {
        if let Some(tuple) = db.relation(relation).iter().find(|t| t.arity() != arity) {
            return Err(SchemaError::ArityMismatch {
                relation: relation.to_string(),
                tuple: tuple.clone(),
                expected: arity,
                found: tuple.arity(),
            });
        }
    }

    Ok(())
}

/// Check every database of `state` against the matching schema component.
///
/// `sys` is checked against [`TransducerSchema::sys`].
pub fn check_state(state: &TransducerState, schema: &TransducerSchema) -> Result<(), SchemaError> {
    let components = [
        (StateComponent::Input, &state.input, &schema.input),
        (StateComponent::Output, &state.output, &schema.output),
        (StateComponent::Msg, &state.msg, &schema.msg),
        (StateComponent::Mem, &state.mem, &schema.mem),
    ];
    for (component, db, db_schema) in components {
        check_database(db, db_schema).map_err(|e| e.in_component(component))?;
    }
    check_database(&state.sys, &TransducerSchema::sys())
        .map_err(|e| e.in_component(StateComponent::Sys))
}

/// Whether `db` holds exactly the relations of `schema` with the right arities.
pub fn database_satisfies_schema(db: &Database, schema: &DatabaseSchema) -> bool {
    check_database(db, schema).is_ok()
}

/// Whether every database of `state` satisfies its schema component.
pub fn state_satisfies_schema(state: &TransducerState, schema: &TransducerSchema) -> bool {
    check_state(state, schema).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple;

    fn example_schema() -> TransducerSchema {
        TransducerSchema::new(
            DatabaseSchema::new().with("I", 2),
            DatabaseSchema::new().with("O", 2),
            DatabaseSchema::new().with("A", 2).with("B", 1),
            DatabaseSchema::new().with("X", 2),
        )
    }

    #[test]
    fn test_database_satisfies_schema() {
        let db = Database::new()
            .with("R", [tuple!(1, 2), tuple!(3, 4)])
            .with("S", [tuple!(1), tuple!(2)]);

        let good = DatabaseSchema::new().with("R", 2).with("S", 1);
        assert!(database_satisfies_schema(&db, &good));

        let swapped = DatabaseSchema::new().with("R", 1).with("S", 2);
        assert!(!database_satisfies_schema(&db, &swapped));
    }

    #[test]
    fn test_relation_set_must_match_exactly() {
        let db = Database::new().with("R", [tuple!(1)]);

        let extra = DatabaseSchema::new().with("R", 1).with("S", 1);
        assert!(matches!(
            check_database(&db, &extra),
            Err(SchemaError::RelationMismatch { .. })
        ));

        let missing = DatabaseSchema::new();
        assert!(!database_satisfies_schema(&db, &missing));
    }

    #[test]
    fn test_arity_mismatch_names_tuple() {
        let db = Database::new().with("R", [tuple!(1, 2, 3)]);
        let schema = DatabaseSchema::new().with("R", 2);

        let err = check_database(&db, &schema).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ArityMismatch {
                relation: "R".to_string(),
                tuple: tuple!(1, 2, 3),
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn test_initial_state_satisfies_schema() {
        let schema = example_schema();
        let nodes = [NodeId::from("X"), NodeId::from("Y")];
        let input = Database::new().with("I", [tuple!(1, 1)]);

        let state = TransducerState::initial(&nodes[0], &nodes, &schema, input);

        assert!(state_satisfies_schema(&state, &schema));
        assert_eq!(state.sys.relation(SYS_ID).len(), 1);
        assert_eq!(state.sys.relation(SYS_ALL).len(), 2);
        assert!(state.sys.relation(SYS_ID).contains(&tuple!("X")));
    }

    #[test]
    fn test_state_violation_names_component() {
        let schema = example_schema();
        let nodes = [NodeId::from("X")];
        let input = Database::empty(&schema.input);
        let mut state = TransducerState::initial(&nodes[0], &nodes, &schema, input);
        state.mem = Database::new().with("X", [tuple!(1)]);

        match check_state(&state, &schema) {
            Err(SchemaError::Component { component, .. }) => {
                assert_eq!(component, StateComponent::Mem)
            }
            other => panic!("expected mem component violation, got {:?}", other),
        }
    }
}
