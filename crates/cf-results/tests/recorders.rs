use cf_results::*;

fn signals() -> Vec<String> {
    vec!["A.y".to_string(), "B.der(x)".to_string()]
}

fn record(recorder: &mut dyn ResultRecorder) {
    recorder.create(0.0, 0.2, &signals()).unwrap();
    recorder.emit(0.0, &[1.0, 0.0]).unwrap();
    recorder.emit(0.1, &[1.0, 0.25]).unwrap();
    recorder.emit(0.2, &[1.0, 0.5]).unwrap();
    recorder.close().unwrap();
}

#[test]
fn csv_file_loads_back() {
    let path = std::env::temp_dir().join("cf_results_recorders.csv");
    let mut recorder = recorder_for_path(&path).unwrap();
    record(recorder.as_mut());

    let trace = load_csv(&path).unwrap();
    assert_eq!(trace.signals, signals());
    assert_eq!(trace.times(), vec![0.0, 0.1, 0.2]);
    assert_eq!(trace.column("B.der(x)"), Some(vec![0.0, 0.25, 0.5]));
}

#[test]
fn jsonl_file_keeps_header() {
    let path = std::env::temp_dir().join("cf_results_recorders.jsonl");
    let mut recorder = recorder_for_path(&path).unwrap();
    record(recorder.as_mut());

    let (header, trace) = load_jsonl(&path).unwrap();
    assert_eq!(header.stop_time, 0.2);
    assert_eq!(header.signals, signals());
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.column("A.y"), Some(vec![1.0, 1.0, 1.0]));
}

#[test]
fn malformed_csv_is_reported() {
    let path = std::env::temp_dir().join("cf_results_malformed.csv");
    std::fs::write(&path, "t,A.y\n0,1\n").unwrap();
    assert!(matches!(load_csv(&path), Err(ResultsError::Parse { .. })));

    std::fs::write(&path, "time,A.y\n0,abc\n").unwrap();
    assert!(matches!(load_csv(&path), Err(ResultsError::Parse { .. })));
}
