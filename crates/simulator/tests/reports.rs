//! Simulator reports as consumed by the CLI.

use serde_json::Value;
use transducer_programs::Program;
use transducer_simulator::{Simulator, SimulatorConfig, SimulatorError, Trace};

#[test]
fn test_run_report_json_includes_trace() {
    let config = SimulatorConfig::new(Program::Monotone)
        .with_seed(17)
        .with_trace(true);
    let report = Simulator::new(config).run().unwrap();

    let json: Value = serde_json::to_value(&report).unwrap();
    let entries = json["trace"]["entries"].as_array().unwrap();

    assert_eq!(entries.len() as u64, report.steps);
    let first = &entries[0];
    assert!(first["snapshot"]["nodes"]["X"]["in"]["I"].is_array());
    assert!(first["step"]["node"].is_string());
}

#[test]
fn test_run_report_json_omits_missing_trace() {
    let report = Simulator::new(SimulatorConfig::new(Program::ReflexivePairs))
        .run()
        .unwrap();

    let json: Value = serde_json::to_value(&report).unwrap();
    assert!(json.get("trace").is_none());
    assert_eq!(json["program"], "reflexive-pairs");
}

#[test]
fn test_trace_replays_onto_fresh_network() {
    let config = SimulatorConfig::new(Program::SynchronizedNegations)
        .with_seed(23)
        .with_max_steps(60);
    let mut network = Program::SynchronizedNegations
        .network(config.to_simulation_config())
        .unwrap();
    let trace = Trace::record(&mut network, config.max_steps, config.quiet_steps).unwrap();

    let mut fresh = Program::SynchronizedNegations
        .network(config.with_seed(0).to_simulation_config())
        .unwrap();
    trace.replay(&mut fresh).unwrap();

    assert_eq!(fresh.out(), network.out());
    assert_eq!(fresh.configuration().states, network.configuration().states);
}

#[test]
fn test_proof_through_simulator() {
    let simulator = Simulator::new(SimulatorConfig::new(Program::Monotone));
    let proof = simulator.proof().unwrap();

    assert!(!proof.agrees());
    let json = serde_json::to_value(&proof).unwrap();
    assert_eq!(json["first"]["O"], serde_json::json!([[1], [2]]));
    assert_eq!(json["second"]["O"], serde_json::json!([]));
}

#[test]
fn test_explore_report_json() {
    let config = SimulatorConfig::new(Program::ReflexivePairs)
        .with_runs(4)
        .with_max_steps(200);
    let report = Simulator::new(config).explore().unwrap();

    let json: Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["runs"], 4);
    assert!(json["outcomes"].as_array().is_some());
}

#[test]
fn test_explore_error_display() {
    let err = Simulator::new(SimulatorConfig::default().with_runs(0))
        .explore()
        .unwrap_err();
    assert_eq!(err, SimulatorError::NoRuns);
    assert_eq!(err.to_string(), "exploration needs at least one run");
}
