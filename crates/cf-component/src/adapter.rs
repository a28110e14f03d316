//! Orchestrator-side wrapper around one unit instance.
//!
//! The adapter owns the unit, knows its variables by name, keeps the two
//! private dependency graphs used to build the composite plan and drives the
//! unit through its lifecycle. Model-exchange units are integrated here with
//! [`EulerState`]; co-simulation units step themselves.

use std::collections::HashMap;

use cf_core::Variable;
use cf_core::variable::ValueRef;
use cf_graph::DirectedGraph;
use tracing::debug;

use crate::error::{ComponentError, ComponentResult, on_status};
use crate::fmi::{FmuInstance, ModelExchange};
use crate::integrator::{EulerState, event_iteration};
use crate::manifest::{Dependencies, FmuKind, ModelDescription};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterPhase {
    Instantiated,
    Initialization,
    Simulation,
    Terminated,
}

/// Integration method for model-exchange units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverMethod {
    ExplicitEuler,
}

impl SolverMethod {
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_lowercase().as_str() {
            "euler" | "explicit_euler" | "expliciteuler" => Some(SolverMethod::ExplicitEuler),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverMethod::ExplicitEuler => "euler",
        }
    }
}

pub struct ComponentAdapter {
    name: String,
    path: String,
    instance: FmuInstance,
    variables: Vec<Variable>,
    by_name: HashMap<String, usize>,
    real_refs: Vec<ValueRef>,
    outputs_graph: DirectedGraph,
    initial_unknowns_graph: DirectedGraph,
    phase: AdapterPhase,
    solver: Option<SolverMethod>,
    euler: Option<EulerState>,
    time: f64,
    row: Vec<f64>,
}

impl ComponentAdapter {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        instance: FmuInstance,
    ) -> ComponentResult<Self> {
        let name = name.into();
        let description = instance.fmu().description();
        description
            .check_indices()
            .map_err(|message| ComponentError::Manifest {
                model: description.model_name.clone(),
                message,
            })?;

        let mut variables: Vec<Variable> = description
            .variables
            .iter()
            .map(|sv| {
                let var = Variable::new(&name, &sv.name, sv.value_ref, sv.causality, sv.base_type);
                match sv.initial {
                    Some(initial) => var.with_initial(initial),
                    None => var,
                }
            })
            .collect();
        for d in &description.derivatives {
            variables[d.state].mark_as_state();
        }

        let by_name = variables
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name().to_string(), i))
            .collect();
        let real_refs: Vec<ValueRef> = variables
            .iter()
            .filter(|v| v.is_real())
            .map(Variable::value_ref)
            .collect();

        let outputs_graph = outputs_graph(description, &variables);
        let initial_unknowns_graph = initial_unknowns_graph(description, &variables);
        let solver = match description.kind {
            FmuKind::ModelExchange => Some(SolverMethod::ExplicitEuler),
            FmuKind::CoSimulation => None,
        };
        debug!(
            "{name}: {} variables, {} outputs graph edges, {} initial unknowns graph edges",
            variables.len(),
            outputs_graph.edges().len(),
            initial_unknowns_graph.edges().len()
        );

        Ok(Self {
            name,
            path: path.into(),
            row: vec![0.0; real_refs.len()],
            instance,
            variables,
            by_name,
            real_refs,
            outputs_graph,
            initial_unknowns_graph,
            phase: AdapterPhase::Instantiated,
            solver,
            euler: None,
            time: 0.0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> &ModelDescription {
        self.instance.fmu().description()
    }

    pub fn kind(&self) -> FmuKind {
        self.description().kind
    }

    pub fn phase(&self) -> AdapterPhase {
        self.phase
    }

    /// Time the unit has been advanced to.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn solver_method(&self) -> Option<SolverMethod> {
        self.solver
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> ComponentResult<&Variable> {
        self.by_name
            .get(name)
            .map(|&i| &self.variables[i])
            .ok_or_else(|| ComponentError::UnknownVariable {
                instance: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Real variables in the order used by [`read_reals`](Self::read_reals).
    pub fn real_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.is_real())
    }

    pub fn outputs_graph(&self) -> &DirectedGraph {
        &self.outputs_graph
    }

    pub fn initial_unknowns_graph(&self) -> &DirectedGraph {
        &self.initial_unknowns_graph
    }

    /// True once a model-exchange unit asked to stop the simulation.
    pub fn terminate_requested(&self) -> bool {
        self.euler.as_ref().is_some_and(EulerState::terminated)
    }

    pub fn set_solver_method(&mut self, method: &str) -> ComponentResult<()> {
        if self.kind() != FmuKind::ModelExchange {
            return Err(ComponentError::InvalidPhase {
                instance: self.name.clone(),
                what: "solver methods apply to model exchange units only",
            });
        }
        let solver = SolverMethod::parse(method).ok_or_else(|| ComponentError::UnsupportedSolver {
            instance: self.name.clone(),
            method: method.to_string(),
        })?;
        self.solver = Some(solver);
        Ok(())
    }

    pub fn enter_initialization(
        &mut self,
        start_time: f64,
        stop_time: f64,
        tolerance: f64,
    ) -> ComponentResult<()> {
        if self.phase != AdapterPhase::Instantiated {
            return Err(self.invalid_phase("enter_initialization requires an instantiated unit"));
        }
        let name = self.name.as_str();
        let fmu = self.instance.fmu_mut();
        fmu.setup_experiment(Some(tolerance), start_time, Some(stop_time))
            .map_err(on_status(name, "fmi2SetupExperiment"))?;
        fmu.enter_initialization_mode()
            .map_err(on_status(name, "fmi2EnterInitializationMode"))?;
        self.time = start_time;
        self.phase = AdapterPhase::Initialization;
        Ok(())
    }

    pub fn exit_initialization(&mut self) -> ComponentResult<()> {
        if self.phase != AdapterPhase::Initialization {
            return Err(self.invalid_phase("exit_initialization requires initialization mode"));
        }
        let name = self.name.as_str();
        match &mut self.instance {
            FmuInstance::ModelExchange(me) => {
                me.exit_initialization_mode()
                    .map_err(on_status(name, "fmi2ExitInitializationMode"))?;
                let info = event_iteration(me.as_mut(), name)?;
                me.enter_continuous_time_mode()
                    .map_err(on_status(name, "fmi2EnterContinuousTimeMode"))?;
                self.euler = Some(EulerState::new(me.as_mut(), name, info)?);
            }
            FmuInstance::CoSimulation(cs) => {
                cs.exit_initialization_mode()
                    .map_err(on_status(name, "fmi2ExitInitializationMode"))?;
            }
        }
        self.phase = AdapterPhase::Simulation;
        Ok(())
    }

    /// Advance the unit to `until`. For model-exchange units `on_event` is
    /// called with the event time and the current real values after every
    /// handled event.
    pub fn do_step(
        &mut self,
        until: f64,
        on_event: &mut dyn FnMut(f64, &[f64]),
    ) -> ComponentResult<()> {
        if self.phase != AdapterPhase::Simulation {
            return Err(self.invalid_phase("do_step requires simulation mode"));
        }
        if until <= self.time {
            return Ok(());
        }

        let Self {
            name,
            instance,
            euler,
            time,
            real_refs,
            row,
            ..
        } = self;
        let name = name.as_str();

        match instance {
            FmuInstance::CoSimulation(cs) => {
                cs.do_step(*time, until - *time, true)
                    .map_err(on_status(name, "fmi2DoStep"))?;
                *time = until;
            }
            FmuInstance::ModelExchange(me) => {
                let Some(euler) = euler.as_mut() else {
                    return Err(ComponentError::InvalidPhase {
                        instance: name.to_string(),
                        what: "integrator buffers missing",
                    });
                };
                let mut emit = |me: &mut dyn ModelExchange, t: f64| -> ComponentResult<()> {
                    me.get_real(&real_refs[..], &mut row[..])
                        .map_err(on_status(name, "fmi2GetReal"))?;
                    on_event(t, &row[..]);
                    Ok(())
                };
                euler.advance(me.as_mut(), name, time, until, &mut emit)?;
            }
        }
        Ok(())
    }

    pub fn terminate(&mut self) -> ComponentResult<()> {
        match self.phase {
            AdapterPhase::Initialization | AdapterPhase::Simulation => {
                let name = self.name.as_str();
                self.instance
                    .fmu_mut()
                    .terminate()
                    .map_err(on_status(name, "fmi2Terminate"))?;
                self.phase = AdapterPhase::Terminated;
            }
            AdapterPhase::Instantiated | AdapterPhase::Terminated => {
                debug!("{}: terminate ignored in {:?}", self.name, self.phase);
            }
        }
        Ok(())
    }

    /// Put the unit back into its just-instantiated condition.
    pub fn reset(&mut self) -> ComponentResult<()> {
        let name = self.name.as_str();
        self.instance
            .fmu_mut()
            .reset()
            .map_err(on_status(name, "fmi2Reset"))?;
        self.euler = None;
        self.time = 0.0;
        self.phase = AdapterPhase::Instantiated;
        Ok(())
    }

    pub fn get_real(&mut self, name: &str) -> ComponentResult<f64> {
        let vr = self.variable(name)?.value_ref();
        let mut value = [0.0];
        self.instance
            .fmu_mut()
            .get_real(&[vr], &mut value)
            .map_err(on_status(&self.name, "fmi2GetReal"))?;
        Ok(value[0])
    }

    /// Write an input or other non-parameter variable.
    pub fn set_real(&mut self, name: &str, value: f64) -> ComponentResult<()> {
        let var = self.variable(name)?;
        if var.is_parameter() {
            return Err(ComponentError::InvalidCausality {
                instance: self.name.clone(),
                name: name.to_string(),
                what: "parameters are written with set_real_parameter",
            });
        }
        let vr = var.value_ref();
        self.instance
            .fmu_mut()
            .set_real(&[vr], &[value])
            .map_err(on_status(&self.name, "fmi2SetReal"))
    }

    /// Write a parameter. Only legal before the simulation starts.
    pub fn set_real_parameter(&mut self, name: &str, value: f64) -> ComponentResult<()> {
        let var = self.variable(name)?;
        if !var.is_parameter() {
            return Err(ComponentError::InvalidCausality {
                instance: self.name.clone(),
                name: name.to_string(),
                what: "not a parameter",
            });
        }
        let vr = var.value_ref();
        if !matches!(
            self.phase,
            AdapterPhase::Instantiated | AdapterPhase::Initialization
        ) {
            return Err(self.invalid_phase("parameters cannot change once simulation started"));
        }
        self.instance
            .fmu_mut()
            .set_real(&[vr], &[value])
            .map_err(on_status(&self.name, "fmi2SetReal"))
    }

    pub fn real_count(&self) -> usize {
        self.real_refs.len()
    }

    /// Read every real variable into `out`, which must hold
    /// [`real_count`](Self::real_count) values.
    pub fn read_reals(&mut self, out: &mut [f64]) -> ComponentResult<()> {
        self.instance
            .fmu_mut()
            .get_real(&self.real_refs, out)
            .map_err(on_status(&self.name, "fmi2GetReal"))
    }

    fn invalid_phase(&self, what: &'static str) -> ComponentError {
        ComponentError::InvalidPhase {
            instance: self.name.clone(),
            what,
        }
    }
}

impl std::fmt::Debug for ComponentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentAdapter")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("kind", &self.kind())
            .field("phase", &self.phase)
            .field("time", &self.time)
            .finish()
    }
}

fn add_dependencies(
    graph: &mut DirectedGraph,
    target: &Variable,
    dependencies: &Dependencies,
    variables: &[Variable],
) {
    match dependencies {
        Dependencies::None => {
            graph.add_variable(target);
        }
        Dependencies::All => {
            graph.add_variable(target);
            for input in variables.iter().filter(|v| v.is_input()) {
                graph.add_edge(input, target);
            }
        }
        Dependencies::On(indices) => {
            graph.add_variable(target);
            for &i in indices {
                graph.add_edge(&variables[i], target);
            }
        }
    }
}

/// Input to output dependencies. Without declared dependencies every output
/// depends on every input.
fn outputs_graph(description: &ModelDescription, variables: &[Variable]) -> DirectedGraph {
    let mut graph = DirectedGraph::new();
    for output in variables.iter().filter(|v| v.is_output()) {
        graph.add_variable(output);
    }
    match &description.outputs {
        Some(unknowns) => {
            for unknown in unknowns {
                let target = &variables[unknown.index];
                add_dependencies(&mut graph, target, &unknown.dependencies, variables);
            }
        }
        None => {
            for output in variables.iter().filter(|v| v.is_output()) {
                add_dependencies(&mut graph, output, &Dependencies::All, variables);
            }
        }
    }
    graph
}

/// Dependencies among initial unknowns. Without declared dependencies every
/// initial unknown depends on every input, and every output on each initial
/// unknown that is not an output itself.
fn initial_unknowns_graph(description: &ModelDescription, variables: &[Variable]) -> DirectedGraph {
    let mut graph = DirectedGraph::new();
    for var in variables.iter().filter(|v| v.is_initial_unknown()) {
        graph.add_variable(var);
    }
    match &description.initial_unknowns {
        Some(unknowns) => {
            for unknown in unknowns {
                let target = &variables[unknown.index];
                add_dependencies(&mut graph, target, &unknown.dependencies, variables);
                if unknown.dependencies == Dependencies::All {
                    feed_outputs(&mut graph, target, variables);
                }
            }
        }
        None => {
            for var in variables.iter().filter(|v| v.is_initial_unknown()) {
                add_dependencies(&mut graph, var, &Dependencies::All, variables);
                feed_outputs(&mut graph, var, variables);
            }
        }
    }
    graph
}

/// `unknown -> output` for every output. Outputs are skipped as sources so
/// the outputs of one unit never form a cycle among themselves.
fn feed_outputs(graph: &mut DirectedGraph, unknown: &Variable, variables: &[Variable]) {
    if unknown.is_output() {
        return;
    }
    for output in variables.iter().filter(|v| v.is_output()) {
        graph.add_edge(unknown, output);
    }
}
