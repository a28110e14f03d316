use cf_component::{ComponentAdapter, ComponentLoader, H_DEFAULT, Registry};

fn load(path: &str, name: &str) -> ComponentAdapter {
    let registry = Registry::with_builtins();
    let instance = registry.load(path, name).unwrap();
    ComponentAdapter::new(name, path, instance).unwrap()
}

fn start(adapter: &mut ComponentAdapter, stop: f64) {
    adapter.enter_initialization(0.0, stop, 1e-6).unwrap();
    adapter.exit_initialization().unwrap();
}

#[test]
fn euler_step_is_fixed() {
    assert_eq!(H_DEFAULT, 1e-2);

    // one internal step leaves h untouched and moves v by -g*h
    let mut ball = load("builtin:bouncing_ball", "ball");
    start(&mut ball, 1.0);
    ball.do_step(0.01, &mut |_, _| {}).unwrap();
    assert_eq!(ball.get_real("h").unwrap(), 1.0);
    assert!((ball.get_real("v").unwrap() + 0.0981).abs() < 1e-12);

    ball.do_step(0.02, &mut |_, _| {}).unwrap();
    assert!((ball.get_real("h").unwrap() - (1.0 - 0.01 * 0.0981)).abs() < 1e-12);
}

#[test]
fn step_size_ignores_tolerance() {
    let mut loose = load("builtin:bouncing_ball", "a");
    loose.enter_initialization(0.0, 1.0, 1e-1).unwrap();
    loose.exit_initialization().unwrap();
    let mut tight = load("builtin:bouncing_ball", "b");
    tight.enter_initialization(0.0, 1.0, 1e-10).unwrap();
    tight.exit_initialization().unwrap();

    loose.do_step(0.3, &mut |_, _| {}).unwrap();
    tight.do_step(0.3, &mut |_, _| {}).unwrap();
    assert_eq!(loose.get_real("h").unwrap(), tight.get_real("h").unwrap());
}

#[test]
fn integrator_follows_input() {
    let mut int = load("builtin:integrator", "I");
    int.set_real_parameter("x0", 0.5).unwrap();
    start(&mut int, 1.0);
    assert_eq!(int.get_real("x").unwrap(), 0.5);

    int.set_real("u", 2.0).unwrap();
    for k in 1..=10 {
        int.do_step(k as f64 * 0.1, &mut |_, _| {}).unwrap();
    }
    assert_eq!(int.time(), 1.0);
    assert!((int.get_real("x").unwrap() - 2.5).abs() < 1e-9);
}

#[test]
fn zero_crossing_triggers_one_event() {
    let mut ball = load("builtin:bouncing_ball", "ball");
    start(&mut ball, 1.0);

    let mut events = Vec::new();
    let width = ball.real_count();
    ball.do_step(0.5, &mut |t, values| {
        assert_eq!(values.len(), width);
        events.push(t);
    })
    .unwrap();

    // Euler with h = 0.01 first reaches the floor at t = 0.46
    assert_eq!(events.len(), 1);
    assert!((events[0] - 0.46).abs() < 1e-9);
    assert!(ball.get_real("v").unwrap() > 0.0);
    assert!(ball.get_real("h").unwrap() > 0.0);
}

#[test]
fn cosimulation_steps_straight_to_target() {
    let mut gain = load("builtin:gain", "G");
    start(&mut gain, 1.0);
    let mut calls = 0;
    gain.do_step(0.7, &mut |_, _| calls += 1).unwrap();
    assert_eq!(gain.time(), 0.7);
    assert_eq!(calls, 0);
}

#[test]
fn reset_restores_start_values() {
    let mut int = load("builtin:integrator", "I");
    start(&mut int, 1.0);
    int.set_real("u", 1.0).unwrap();
    int.do_step(0.5, &mut |_, _| {}).unwrap();
    assert!(int.get_real("x").unwrap() > 0.4);

    int.terminate().unwrap();
    int.reset().unwrap();
    start(&mut int, 1.0);
    assert_eq!(int.get_real("x").unwrap(), 0.0);
    assert_eq!(int.get_real("u").unwrap(), 0.0);
}
