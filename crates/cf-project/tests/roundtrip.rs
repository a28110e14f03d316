use cf_project::*;

fn chain() -> CompositeDef {
    CompositeDef {
        version: 1,
        name: "chain".to_string(),
        submodels: vec![
            SubModelDef {
                name: "A".to_string(),
                model_file: "builtin:constant".to_string(),
                solver: None,
                parameters: vec![ParameterDef {
                    name: "value".to_string(),
                    value: 1.0,
                }],
            },
            SubModelDef {
                name: "I".to_string(),
                model_file: "builtin:integrator".to_string(),
                solver: Some("euler".to_string()),
                parameters: vec![],
            },
        ],
        connections: vec![ConnectionDef {
            from: "A.y".to_string(),
            to: "I.u".to_string(),
        }],
        simulation: SimulationDef {
            start_time: 0.0,
            stop_time: 2.0,
            tolerance: 1e-6,
            communication_interval: 0.1,
            result_file: Some("chain_res.csv".to_string()),
            variable_filter: Some("I\\.x".to_string()),
        },
    }
}

#[test]
fn roundtrip_yaml() {
    let def = chain();
    let path = std::env::temp_dir().join("cf_project_roundtrip.yaml");
    save_yaml(&path, &def).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(def, loaded);
}

#[test]
fn roundtrip_json() {
    let def = chain();
    let path = std::env::temp_dir().join("cf_project_roundtrip.json");
    save(&path, &def).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(def, loaded);
}

#[test]
fn minimal_yaml_uses_defaults() {
    let text = "name: empty\n";
    let def: CompositeDef = serde_yaml::from_str(text).unwrap();
    assert_eq!(def.version, LATEST_VERSION);
    assert!(def.submodels.is_empty());
    assert_eq!(def.simulation, SimulationDef::default());
    validate_description(&def).unwrap();
}

#[test]
fn invalid_description_is_not_saved() {
    let mut def = chain();
    def.connections.push(ConnectionDef {
        from: "missing.y".to_string(),
        to: "A.value".to_string(),
    });
    let path = std::env::temp_dir().join("cf_project_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &def),
        Err(ProjectError::Validation(_))
    ));
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::env::temp_dir().join("cf_project_roundtrip.xml");
    assert!(matches!(
        load(&path),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}
