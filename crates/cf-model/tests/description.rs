use std::fs;
use std::path::PathBuf;

use cf_component::Registry;
use cf_model::{CompositeModel, ModelError, Settings};
use cf_project::{CompositeDef, ConnectionDef, ParameterDef, SimulationDef, SubModelDef};
use cf_results::load_csv;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cosimflow_{}_{name}", std::process::id()))
}

fn chain_description() -> CompositeDef {
    let mut def = CompositeDef::new("chain");
    def.submodels = vec![
        SubModelDef {
            name: "A".into(),
            model_file: "builtin:constant".into(),
            solver: None,
            parameters: vec![ParameterDef {
                name: "value".into(),
                value: 1.5,
            }],
        },
        SubModelDef {
            name: "B".into(),
            model_file: "builtin:gain".into(),
            solver: None,
            parameters: vec![],
        },
        SubModelDef {
            name: "C".into(),
            model_file: "builtin:integrator".into(),
            solver: Some("euler".into()),
            parameters: vec![ParameterDef {
                name: "x0".into(),
                value: 1.0,
            }],
        },
    ];
    def.connections = vec![
        ConnectionDef {
            from: "A.y".into(),
            to: "B.u".into(),
        },
        ConnectionDef {
            from: "B.y".into(),
            to: "C.u".into(),
        },
    ];
    def.simulation = SimulationDef {
        start_time: 0.0,
        stop_time: 0.5,
        tolerance: 1e-6,
        communication_interval: 0.1,
        result_file: None,
        variable_filter: None,
    };
    def
}

#[test]
fn description_round_trips_through_model() {
    let def = chain_description();
    let model = CompositeModel::from_description(&def, Box::new(Registry::with_builtins())).unwrap();
    assert_eq!(model.to_description(), def);
}

#[test]
fn saved_yaml_loads_with_default_result_file() {
    let def = chain_description();
    let model = CompositeModel::from_description(&def, Box::new(Registry::with_builtins())).unwrap();
    let path = temp_path("chain.yaml");
    model.save(&path).unwrap();

    let loaded = CompositeModel::load(&path).unwrap();
    let stem = path.file_stem().unwrap().to_str().unwrap().to_string();
    assert_eq!(
        loaded.settings().result_file,
        Some(PathBuf::from(format!("{stem}_res.csv")))
    );
    assert_eq!(loaded.connections(), model.connections());
    fs::remove_file(&path).ok();
}

#[test]
fn invalid_description_is_rejected() {
    let mut def = chain_description();
    def.connections.push(ConnectionDef {
        from: "A.y".into(),
        to: "Z.u".into(),
    });
    let err = CompositeModel::from_description(&def, Box::new(Registry::with_builtins()))
        .unwrap_err();
    assert!(matches!(err, ModelError::Project(_)));
}

#[test]
fn simulation_writes_csv() {
    let path = temp_path("chain_res.csv");
    let mut def = chain_description();
    def.simulation.result_file = Some(path.display().to_string());

    let mut model =
        CompositeModel::from_description(&def, Box::new(Registry::with_builtins())).unwrap();
    model.initialize().unwrap();
    model.simulate().unwrap();
    model.terminate().unwrap();

    let trace = load_csv(&path).unwrap();
    assert_eq!(trace.len(), 6);
    assert_eq!(trace.times().last().copied(), Some(0.5));
    // B.y = 2 * 1.5, integrated into C.x from 1.0
    let y = trace.column("B.y").unwrap();
    assert!(y.iter().all(|v| (*v - 3.0).abs() < 1e-12));
    let x = trace.column("C.x").unwrap();
    assert!((x[5] - 2.5).abs() < 1e-9);
    fs::remove_file(&path).ok();
}

#[test]
fn unknown_result_extension_records_nothing() {
    let path = temp_path("chain_res.mat");
    let settings = Settings::default().with_result_file(&path);
    let mut model = CompositeModel::new("chain", settings);
    model.instantiate("builtin:constant", "A").unwrap();
    model.initialize().unwrap();
    model.simulate().unwrap();
    model.terminate().unwrap();
    assert!(!path.exists());
}

#[test]
fn dependency_graphs_export_as_dot() {
    let def = chain_description();
    let model = CompositeModel::from_description(&def, Box::new(Registry::with_builtins())).unwrap();
    let prefix = temp_path("graph");
    let (init, sim) = model
        .export_dependency_graph(&prefix.display().to_string())
        .unwrap();

    let text = fs::read_to_string(&sim).unwrap();
    assert!(text.starts_with("digraph G {"));
    assert!(text.contains("label=\"A.y\""));
    assert!(text.contains("label=\"C.u\""));
    assert!(init.exists());
    fs::remove_file(init).ok();
    fs::remove_file(sim).ok();
}

#[test]
fn describe_mentions_every_instance() {
    let def = chain_description();
    let model = CompositeModel::from_description(&def, Box::new(Registry::with_builtins())).unwrap();
    let text = model.describe();
    for line in ["A (CS)", "B (CS)", "C (ME)", "  solver: euler", "A.y -> B.u", "B.y -> C.u"] {
        assert!(text.contains(line), "missing '{line}' in\n{text}");
    }
}
