//! The composite model: a set of coupled unit instances and the state
//! machine that drives them through time.

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::PathBuf;

use cf_component::{
    ComponentAdapter, ComponentError, ComponentLoader, Registry, SolverMethod,
};
use cf_core::{
    CancelToken, Phase, PhaseClocks, VarRef, Variable, advance_towards, ensure_finite,
};
use cf_graph::DirectedGraph;
use cf_results::{ResultRecorder, recorder_for_path};
use tracing::{debug, error, info, warn};

use crate::algebraic::{SignalAccess, propagate};
use crate::error::{ModelError, ModelResult};
use crate::settings::Settings;
use crate::state::ModelState;

/// Open result file of a running simulation.
struct Session {
    recorder: Box<dyn ResultRecorder>,
    /// Recorder came from `attach_recorder` and is handed back on close.
    attached: bool,
    /// Every real of every instance, instances in name order.
    values: Vec<f64>,
    spans: BTreeMap<String, Range<usize>>,
    /// Positions in `values` of the recorded signals.
    selected: Vec<usize>,
    row: Vec<f64>,
}

impl Session {
    fn sample(
        &mut self,
        components: &mut BTreeMap<String, ComponentAdapter>,
        time: f64,
    ) -> ModelResult<()> {
        for (name, span) in &self.spans {
            if let Some(component) = components.get_mut(name) {
                component.read_reals(&mut self.values[span.clone()])?;
            }
        }
        self.emit(time)
    }

    /// Row for an event inside a step: fresh values of `instance`, the last
    /// sampled values of everything else.
    fn event(&mut self, instance: &str, time: f64, values: &[f64]) -> ModelResult<()> {
        if let Some(span) = self.spans.get(instance) {
            self.values[span.clone()].copy_from_slice(values);
        }
        self.emit(time)
    }

    fn emit(&mut self, time: f64) -> ModelResult<()> {
        for (slot, &i) in self.row.iter_mut().zip(&self.selected) {
            *slot = self.values[i];
        }
        self.recorder.emit(time, &self.row)?;
        Ok(())
    }
}

/// Signal access over the instances of a model.
struct Signals<'a> {
    components: &'a mut BTreeMap<String, ComponentAdapter>,
}

impl Signals<'_> {
    fn adapter(&mut self, var: &Variable) -> ModelResult<&mut ComponentAdapter> {
        self.components
            .get_mut(var.instance())
            .ok_or_else(|| ModelError::UnknownInstance {
                name: var.instance().to_string(),
            })
    }
}

impl SignalAccess for Signals<'_> {
    fn read(&mut self, var: &Variable) -> ModelResult<f64> {
        Ok(self.adapter(var)?.get_real(var.name())?)
    }

    fn write(&mut self, var: &Variable, value: f64) -> ModelResult<()> {
        self.adapter(var)?.set_real(var.name(), value)?;
        Ok(())
    }
}

/// Coupled simulation of several units.
///
/// Instances are added with [`instantiate`](Self::instantiate) and wired with
/// [`add_connection`](Self::add_connection). [`initialize`](Self::initialize)
/// resolves the initial unknowns, after which the model is stepped in
/// communication intervals. Instances are always visited in name order.
pub struct CompositeModel {
    pub(crate) name: String,
    pub(crate) components: BTreeMap<String, ComponentAdapter>,
    initial_unknowns_graph: DirectedGraph,
    outputs_graph: DirectedGraph,
    state: ModelState,
    time: f64,
    pub(crate) settings: Settings,
    loader: Box<dyn ComponentLoader>,
    recorder: Option<Box<dyn ResultRecorder>>,
    session: Option<Session>,
    pub(crate) connections: Vec<(VarRef, VarRef)>,
    pub(crate) parameters: Vec<(VarRef, f64)>,
    pub(crate) solvers: BTreeMap<String, SolverMethod>,
    clocks: PhaseClocks,
    cancel: CancelToken,
}

impl CompositeModel {
    /// Model resolving paths against the `builtin:` registry.
    pub fn new(name: impl Into<String>, settings: Settings) -> Self {
        Self::with_loader(name, settings, Box::new(Registry::with_builtins()))
    }

    pub fn with_loader(
        name: impl Into<String>,
        settings: Settings,
        loader: Box<dyn ComponentLoader>,
    ) -> Self {
        Self {
            name: name.into(),
            components: BTreeMap::new(),
            initial_unknowns_graph: DirectedGraph::new(),
            outputs_graph: DirectedGraph::new(),
            state: ModelState::Instantiated,
            time: settings.start_time,
            settings,
            loader,
            recorder: None,
            session: None,
            connections: Vec::new(),
            parameters: Vec::new(),
            solvers: BTreeMap::new(),
            clocks: PhaseClocks::new(),
            cancel: CancelToken::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the experiment settings. Frozen once initialized.
    pub fn set_settings(&mut self, settings: Settings) -> ModelResult<()> {
        self.require(&[ModelState::Instantiated], "set_settings")?;
        settings.validate()?;
        self.time = settings.start_time;
        self.settings = settings;
        Ok(())
    }

    /// Record into `recorder` instead of the configured result file.
    pub fn attach_recorder(&mut self, recorder: Box<dyn ResultRecorder>) -> ModelResult<()> {
        self.require(&[ModelState::Instantiated], "attach_recorder")?;
        self.recorder = Some(recorder);
        Ok(())
    }

    /// Handle that stops a running simulation before its next unit step.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn clocks(&self) -> &PhaseClocks {
        &self.clocks
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentAdapter> {
        self.components.values()
    }

    pub fn component(&self, name: &str) -> Option<&ComponentAdapter> {
        self.components.get(name)
    }

    pub fn initial_unknowns_graph(&self) -> &DirectedGraph {
        &self.initial_unknowns_graph
    }

    pub fn outputs_graph(&self) -> &DirectedGraph {
        &self.outputs_graph
    }

    /// Connections in the order they were added.
    pub fn connections(&self) -> &[(VarRef, VarRef)] {
        &self.connections
    }

    /// Parameter values set through [`set_real`](Self::set_real).
    pub fn parameters(&self) -> &[(VarRef, f64)] {
        &self.parameters
    }

    /// Names of the recorded signals, in row order.
    pub fn signals(&self) -> ModelResult<Vec<String>> {
        Ok(self
            .recorded_signals()?
            .into_iter()
            .map(|(_, name)| name)
            .collect())
    }

    /// Record only the signals whose `instance.variable` name matches
    /// `pattern` as a whole.
    pub fn set_variable_filter(&mut self, pattern: &str) -> ModelResult<()> {
        self.require(&[ModelState::Instantiated], "set_variable_filter")?;
        let settings = self.settings.clone().with_variable_filter(pattern);
        if let Err(e) = settings.signal_filter() {
            error!("{e}");
            return Err(e);
        }
        debug!("{}: variable filter '{pattern}'", self.name);
        self.settings = settings;
        Ok(())
    }

    /// Load the unit at `path` as instance `name`.
    pub fn instantiate(&mut self, path: &str, name: &str) -> ModelResult<()> {
        self.require(&[ModelState::Instantiated], "instantiate")?;
        if name.is_empty() || name.contains('.') {
            error!("invalid instance name '{name}'");
            return Err(ModelError::InvalidName {
                name: name.to_string(),
            });
        }
        if self.components.contains_key(name) {
            error!("instance '{name}' already exists");
            return Err(ModelError::DuplicateInstance {
                name: name.to_string(),
            });
        }

        let timer = PhaseClocks::start(Phase::Instantiation);
        let instance = self.loader.load(path, name)?;
        let adapter = ComponentAdapter::new(name, path, instance)?;
        self.initial_unknowns_graph
            .include_graph(adapter.initial_unknowns_graph());
        self.outputs_graph.include_graph(adapter.outputs_graph());
        info!(
            "instantiated {name} ({}) from {path}",
            adapter.kind().as_str()
        );
        self.components.insert(name.to_string(), adapter);
        self.clocks.stop(timer);
        Ok(())
    }

    /// Connect output `from` to input `to`, both `instance.variable`.
    pub fn add_connection(&mut self, from: &str, to: &str) -> ModelResult<()> {
        self.require(&[ModelState::Instantiated], "add_connection")?;
        let from = VarRef::parse(from)?;
        let to = VarRef::parse(to)?;
        let output = self.resolve(&from)?.clone();
        let input = self.resolve(&to)?.clone();
        if !output.is_output() || !input.is_input() {
            warn!(
                "connection {from} -> {to} is not output -> input ({} -> {}); it carries no signal",
                output.causality().as_str(),
                input.causality().as_str()
            );
        }
        debug!("connect {from} -> {to}");
        self.initial_unknowns_graph.add_edge(&output, &input);
        self.outputs_graph.add_edge(&output, &input);
        self.connections.push((from, to));
        Ok(())
    }

    /// Write a parameter or an input.
    pub fn set_real(&mut self, reference: &str, value: f64) -> ModelResult<()> {
        let r = VarRef::parse(reference)?;
        ensure_finite(value, "value")?;
        let var = self.resolve(&r)?.clone();
        let component = self.component_mut(&r.instance)?;
        if var.is_parameter() {
            component.set_real_parameter(var.name(), value)?;
            match self.parameters.iter_mut().find(|(p, _)| *p == r) {
                Some(entry) => entry.1 = value,
                None => self.parameters.push((r, value)),
            }
            Ok(())
        } else if var.is_input() {
            component.set_real(var.name(), value)?;
            Ok(())
        } else {
            error!("cannot set {reference}: {}", var.causality().as_str());
            Err(ModelError::NotSettable {
                reference: reference.to_string(),
                what: "only parameters and inputs can be set",
            })
        }
    }

    pub fn get_real(&mut self, reference: &str) -> ModelResult<f64> {
        let r = VarRef::parse(reference)?;
        let name = self.resolve(&r)?.name().to_string();
        Ok(self.component_mut(&r.instance)?.get_real(&name)?)
    }

    /// Select the integration method of a model-exchange instance.
    pub fn set_solver_method(&mut self, instance: &str, method: &str) -> ModelResult<()> {
        self.require(&[ModelState::Instantiated], "set_solver_method")?;
        let component = self.component_mut(instance)?;
        component.set_solver_method(method)?;
        if let Some(solver) = component.solver_method() {
            self.solvers.insert(instance.to_string(), solver);
        }
        Ok(())
    }

    /// Enter initialization, resolve the initial unknowns and open the result
    /// session. On failure every instance is reset and the model stays
    /// `Instantiated`.
    pub fn initialize(&mut self) -> ModelResult<()> {
        self.require(&[ModelState::Instantiated], "initialize")?;
        self.settings.validate()?;
        let Settings {
            start_time,
            stop_time,
            tolerance,
            ..
        } = self.settings;

        let timer = PhaseClocks::start(Phase::Initialization);
        info!(
            "initializing {} ({} instances) at t={start_time}",
            self.name,
            self.components.len()
        );
        self.state = ModelState::Initialization;
        self.time = start_time;

        let outcome = self.initialize_components(start_time, stop_time, tolerance);
        self.clocks.stop(timer);
        let outcome = outcome.and_then(|()| {
            self.state = ModelState::Simulation;
            self.open_session()
        });
        if let Err(e) = outcome {
            error!("{}: initialization failed: {e}", self.name);
            self.abandon_initialization();
            return Err(e);
        }
        Ok(())
    }

    /// Current model time. Only meaningful once initialization started.
    pub fn current_time(&self) -> ModelResult<f64> {
        self.require(
            &[ModelState::Initialization, ModelState::Simulation],
            "current_time",
        )?;
        Ok(self.time)
    }

    /// Advance `n` communication intervals.
    pub fn do_steps(&mut self, n: usize) -> ModelResult<()> {
        self.require(&[ModelState::Simulation], "do_steps")?;
        let h = self.settings.communication_interval;
        for _ in 0..n {
            let next = self.time + h;
            self.step_to(next)?;
            if self.termination_requested() {
                break;
            }
        }
        Ok(())
    }

    /// Advance in communication intervals until `target`; the last interval
    /// is shortened to land on it.
    pub fn step_until(&mut self, target: f64) -> ModelResult<()> {
        self.require(&[ModelState::Simulation], "step_until")?;
        ensure_finite(target, "target time")?;
        let h = self.settings.communication_interval;
        while self.time < target {
            let next = advance_towards(self.time, h, target);
            self.step_to(next)?;
            if self.termination_requested() {
                break;
            }
        }
        Ok(())
    }

    /// Run from the current time to the configured stop time.
    pub fn simulate(&mut self) -> ModelResult<()> {
        self.require(&[ModelState::Simulation], "simulate")?;
        self.step_until(self.settings.stop_time)?;
        info!("{}: simulation finished at t={}", self.name, self.time);
        Ok(())
    }

    /// End the run, close the result session and return every instance to
    /// its just-instantiated condition with the recorded parameters.
    pub fn terminate(&mut self) -> ModelResult<()> {
        if self.state == ModelState::Instantiated {
            info!("{}: nothing to terminate", self.name);
            return Ok(());
        }

        let timer = PhaseClocks::start(Phase::Termination);
        let mut failure: Option<ModelError> = None;
        for component in self.components.values_mut() {
            if let Err(e) = component.terminate() {
                error!("{e}");
                failure.get_or_insert(e.into());
            }
        }
        if let Err(e) = self.restore_instances() {
            error!("{}: returning instances to instantiated: {e}", self.name);
            failure.get_or_insert(e);
        }
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.recorder.close() {
                error!("closing result file: {e}");
                failure.get_or_insert(e.into());
            }
            if session.attached {
                self.recorder = Some(session.recorder);
            }
        }
        self.clocks.stop(timer);
        self.state = ModelState::Instantiated;

        info!("{}: terminated at t={}", self.name, self.time);
        self.time = self.settings.start_time;
        for line in self.clocks.summary() {
            info!("  {line}");
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Return every instance to its just-instantiated condition. Parameter
    /// values set on the model are applied again.
    pub fn reset(&mut self) -> ModelResult<()> {
        self.release_session();
        self.state = ModelState::Instantiated;
        self.time = self.settings.start_time;
        self.restore_instances()?;
        info!("{}: reset", self.name);
        Ok(())
    }

    /// Write `<prefix>_initialization.dot` and `<prefix>_simulation.dot`.
    pub fn export_dependency_graph(&self, prefix: &str) -> ModelResult<(PathBuf, PathBuf)> {
        let initialization = PathBuf::from(format!("{prefix}_initialization.dot"));
        let simulation = PathBuf::from(format!("{prefix}_simulation.dot"));
        self.initial_unknowns_graph.export_dot(&initialization)?;
        self.outputs_graph.export_dot(&simulation)?;
        info!(
            "dependency graphs written to {} and {}",
            initialization.display(),
            simulation.display()
        );
        Ok((initialization, simulation))
    }

    fn require(&self, allowed: &[ModelState], operation: &'static str) -> ModelResult<()> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        error!("{operation} is not allowed while {}", self.state);
        Err(ModelError::InvalidState {
            operation,
            state: self.state,
        })
    }

    fn component_mut(&mut self, name: &str) -> ModelResult<&mut ComponentAdapter> {
        self.components
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownInstance {
                name: name.to_string(),
            })
    }

    fn resolve(&self, r: &VarRef) -> ModelResult<&Variable> {
        let Some(component) = self.components.get(&r.instance) else {
            error!("unknown instance '{}'", r.instance);
            return Err(ModelError::UnknownInstance {
                name: r.instance.clone(),
            });
        };
        component.variable(&r.variable).map_err(|e| match e {
            ComponentError::UnknownVariable { .. } => {
                error!("unknown variable '{r}'");
                ModelError::UnknownVariable {
                    reference: r.to_string(),
                }
            }
            other => other.into(),
        })
    }

    fn initialize_components(
        &mut self,
        start_time: f64,
        stop_time: f64,
        tolerance: f64,
    ) -> ModelResult<()> {
        for component in self.components.values_mut() {
            component.enter_initialization(start_time, stop_time, tolerance)?;
        }
        let mut signals = Signals {
            components: &mut self.components,
        };
        propagate(
            &mut signals,
            self.initial_unknowns_graph.sorted_connections(),
            tolerance,
        )?;
        for component in self.components.values_mut() {
            component.exit_initialization()?;
        }
        Ok(())
    }

    /// Back to `Instantiated` after a failed initialization. Instances that
    /// entered initialization are terminated and reset.
    fn abandon_initialization(&mut self) {
        for component in self.components.values_mut() {
            if let Err(e) = component.terminate() {
                warn!("{e}");
            }
        }
        if let Err(e) = self.restore_instances() {
            error!("{}: returning instances to instantiated: {e}", self.name);
        }
        self.release_session();
        self.state = ModelState::Instantiated;
        self.time = self.settings.start_time;
    }

    /// Reset every instance and apply the recorded parameter values again.
    fn restore_instances(&mut self) -> ModelResult<()> {
        for component in self.components.values_mut() {
            component.reset()?;
        }
        for (r, value) in &self.parameters {
            if let Some(component) = self.components.get_mut(&r.instance) {
                component.set_real_parameter(&r.variable, *value)?;
            }
        }
        Ok(())
    }

    /// Drop the open session without closing it, keeping an attached
    /// recorder for the next run.
    fn release_session(&mut self) {
        if let Some(session) = self.session.take()
            && session.attached
        {
            self.recorder = Some(session.recorder);
        }
    }

    /// Recorded signals with their position among all real variables.
    fn recorded_signals(&self) -> ModelResult<Vec<(usize, String)>> {
        let filter = self.settings.signal_filter()?;
        Ok(self
            .components
            .values()
            .flat_map(|c| c.real_variables().map(Variable::to_string))
            .enumerate()
            .filter(|(_, name)| filter.as_ref().is_none_or(|re| re.is_match(name)))
            .collect())
    }

    fn termination_requested(&self) -> bool {
        match self.components.values().find(|c| c.terminate_requested()) {
            Some(component) => {
                info!(
                    "{} requested termination at t={}",
                    component.name(),
                    self.time
                );
                true
            }
            None => false,
        }
    }

    fn open_session(&mut self) -> ModelResult<()> {
        let (selected, signals): (Vec<usize>, Vec<String>) =
            self.recorded_signals()?.into_iter().unzip();
        let (mut recorder, attached) = match self.recorder.take() {
            Some(recorder) => (recorder, true),
            None => match self.settings.result_file.as_deref().and_then(recorder_for_path) {
                Some(recorder) => (recorder, false),
                None => {
                    debug!("{}: no result recorder configured", self.name);
                    return Ok(());
                }
            },
        };

        let mut spans = BTreeMap::new();
        let mut total = 0;
        for (name, component) in &self.components {
            let count = component.real_count();
            spans.insert(name.clone(), total..total + count);
            total += count;
        }

        if let Err(e) = recorder.create(self.settings.start_time, self.settings.stop_time, &signals)
        {
            if attached {
                self.recorder = Some(recorder);
            }
            return Err(e.into());
        }
        if let Some(path) = &self.settings.result_file
            && !attached
        {
            info!("{}: recording {} signals to {}", self.name, signals.len(), path.display());
        }

        let mut session = Session {
            recorder,
            attached,
            values: vec![0.0; total],
            spans,
            row: vec![0.0; selected.len()],
            selected,
        };
        let timer = PhaseClocks::start(Phase::Results);
        let first = session.sample(&mut self.components, self.time);
        self.clocks.stop(timer);
        self.session = Some(session);
        first
    }

    /// One communication step to `next`.
    fn step_to(&mut self, next: f64) -> ModelResult<()> {
        let timer = PhaseClocks::start(Phase::Simulation);
        self.step_components(next)?;
        self.clocks.stop(timer);
        self.time = next;

        let timer = PhaseClocks::start(Phase::Communication);
        let mut signals = Signals {
            components: &mut self.components,
        };
        propagate(
            &mut signals,
            self.outputs_graph.sorted_connections(),
            self.settings.tolerance,
        )?;
        self.clocks.stop(timer);

        if let Some(session) = self.session.as_mut() {
            let timer = PhaseClocks::start(Phase::Results);
            session.sample(&mut self.components, next)?;
            self.clocks.stop(timer);
        }
        debug!("{}: t={next}", self.name);
        Ok(())
    }

    fn step_components(&mut self, next: f64) -> ModelResult<()> {
        let Self {
            components,
            session,
            cancel,
            time,
            ..
        } = self;

        for (name, component) in components.iter_mut() {
            if cancel.is_cancelled() {
                warn!("cancelled at t={time} before stepping {name}");
                return Err(ModelError::Cancelled { time: *time });
            }
            let mut failure: Option<ModelError> = None;
            let mut on_event = |t: f64, values: &[f64]| {
                if let Some(session) = session.as_mut()
                    && let Err(e) = session.event(name, t, values)
                {
                    failure.get_or_insert(e);
                }
            };
            component.do_step(next, &mut on_event)?;
            if let Some(e) = failure {
                return Err(e);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for CompositeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeModel")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("time", &self.time)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_component::AdapterPhase;

    fn chain() -> CompositeModel {
        let mut model = CompositeModel::new("chain", Settings::default());
        model.instantiate("builtin:constant", "A").unwrap();
        model.instantiate("builtin:gain", "B").unwrap();
        model.add_connection("A.y", "B.u").unwrap();
        model
    }

    #[test]
    fn rejects_bad_instance_names() {
        let mut model = chain();
        assert!(matches!(
            model.instantiate("builtin:gain", "B"),
            Err(ModelError::DuplicateInstance { .. })
        ));
        assert!(matches!(
            model.instantiate("builtin:gain", "a.b"),
            Err(ModelError::InvalidName { .. })
        ));
        assert!(matches!(
            model.instantiate("builtin:nothing", "C"),
            Err(ModelError::Component(ComponentError::UnknownModel { .. }))
        ));
        assert_eq!(model.components().count(), 2);
    }

    #[test]
    fn unknown_references_are_reported() {
        let mut model = chain();
        assert!(matches!(
            model.add_connection("X.y", "B.u"),
            Err(ModelError::UnknownInstance { .. })
        ));
        assert!(matches!(
            model.add_connection("A.nope", "B.u"),
            Err(ModelError::UnknownVariable { .. })
        ));
        assert!(matches!(
            model.add_connection("Ay", "B.u"),
            Err(ModelError::Core(_))
        ));
        assert_eq!(model.connections().len(), 1);
    }

    #[test]
    fn set_real_dispatches_on_causality() {
        let mut model = chain();
        model.set_real("B.k", 3.0).unwrap();
        model.set_real("B.k", 4.0).unwrap();
        model.set_real("B.u", 1.5).unwrap();
        assert_eq!(model.parameters().len(), 1);
        assert_eq!(model.parameters()[0].1, 4.0);
        assert_eq!(model.get_real("B.y").unwrap(), 6.0);
        assert!(matches!(
            model.set_real("B.y", 1.0),
            Err(ModelError::NotSettable { .. })
        ));
    }

    #[test]
    fn plan_follows_connections() {
        let model = chain();
        let plan = model.outputs_graph().sorted_connections();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].to_string(), "A.y -> B.u");
    }

    #[test]
    fn settings_are_frozen_after_initialize() {
        let mut model = chain();
        model
            .set_settings(Settings::default().with_stop_time(0.5))
            .unwrap();
        model.initialize().unwrap();
        assert!(matches!(
            model.set_settings(Settings::default()),
            Err(ModelError::InvalidState { .. })
        ));
        assert_eq!(model.settings().stop_time, 0.5);
    }

    #[test]
    fn current_time_requires_initialization() {
        let mut model = chain();
        assert!(model.current_time().is_err());
        model.initialize().unwrap();
        assert_eq!(model.current_time().unwrap(), 0.0);
        model.do_steps(3).unwrap();
        assert!((model.current_time().unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn variable_filter_selects_signals() {
        let mut model = chain();
        assert_eq!(
            model.signals().unwrap(),
            vec!["A.value", "A.y", "B.k", "B.offset", "B.u", "B.y"]
        );
        model.set_variable_filter("B\\.(u|y)").unwrap();
        assert_eq!(model.signals().unwrap(), vec!["B.u", "B.y"]);

        assert!(matches!(
            model.set_variable_filter("B.(u"),
            Err(ModelError::InvalidFilter { .. })
        ));
        assert_eq!(
            model.settings().variable_filter.as_deref(),
            Some("B\\.(u|y)")
        );

        model.initialize().unwrap();
        assert!(matches!(
            model.set_variable_filter(".*"),
            Err(ModelError::InvalidState { .. })
        ));
    }

    #[test]
    fn terminate_keeps_parameters() {
        let mut model = chain();
        model.set_real("B.k", 5.0).unwrap();
        model.initialize().unwrap();
        model.do_steps(2).unwrap();
        model.terminate().unwrap();
        assert_eq!(model.get_real("B.k").unwrap(), 5.0);
        assert!(model.components().all(|c| c.phase() == AdapterPhase::Instantiated));
    }

    #[test]
    fn reset_reapplies_parameters() {
        let mut model = chain();
        model.set_real("B.k", 5.0).unwrap();
        model.initialize().unwrap();
        model.simulate().unwrap();
        model.reset().unwrap();
        assert_eq!(model.state(), ModelState::Instantiated);
        assert_eq!(model.get_real("B.k").unwrap(), 5.0);
    }
}
