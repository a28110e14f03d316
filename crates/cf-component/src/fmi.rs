//! Capability traits a simulation unit exposes to the orchestrator.
//!
//! The traits mirror the FMI 2.0 calling sequence. Every call returns
//! `Err(status)` for any status worse than `Warning`; the adapter attaches the
//! call name and instance when it turns a status into a [`ComponentError`].
//!
//! [`ComponentError`]: crate::ComponentError

use std::fmt;

use cf_core::variable::ValueRef;

use crate::manifest::ModelDescription;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FmiStatus {
    Ok,
    Warning,
    Discard,
    Error,
    Fatal,
    Pending,
}

impl fmt::Display for FmiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FmiStatus::Ok => "OK",
            FmiStatus::Warning => "Warning",
            FmiStatus::Discard => "Discard",
            FmiStatus::Error => "Error",
            FmiStatus::Fatal => "Fatal",
            FmiStatus::Pending => "Pending",
        };
        f.write_str(s)
    }
}

pub type FmiResult<T> = Result<T, FmiStatus>;

/// Result of one `new_discrete_states` call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventInfo {
    pub new_discrete_states_needed: bool,
    pub terminate_simulation: bool,
    pub nominals_of_continuous_states_changed: bool,
    pub values_of_continuous_states_changed: bool,
    pub next_event_time: Option<f64>,
}

/// Flags returned after an accepted integrator step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub enter_event_mode: bool,
    pub terminate_simulation: bool,
}

/// Calls shared by both interface kinds.
pub trait Fmu {
    fn description(&self) -> &ModelDescription;

    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> FmiResult<()>;

    fn enter_initialization_mode(&mut self) -> FmiResult<()>;
    fn exit_initialization_mode(&mut self) -> FmiResult<()>;
    fn terminate(&mut self) -> FmiResult<()>;

    /// Return to the state right after instantiation.
    fn reset(&mut self) -> FmiResult<()>;

    fn get_real(&mut self, vrs: &[ValueRef], values: &mut [f64]) -> FmiResult<()>;
    fn set_real(&mut self, vrs: &[ValueRef], values: &[f64]) -> FmiResult<()>;
}

/// Model exchange: the orchestrator integrates the continuous states.
pub trait ModelExchange: Fmu {
    fn set_time(&mut self, time: f64) -> FmiResult<()>;
    fn set_continuous_states(&mut self, states: &[f64]) -> FmiResult<()>;
    fn get_continuous_states(&mut self, states: &mut [f64]) -> FmiResult<()>;
    fn get_derivatives(&mut self, derivatives: &mut [f64]) -> FmiResult<()>;
    fn get_event_indicators(&mut self, indicators: &mut [f64]) -> FmiResult<()>;
    fn enter_event_mode(&mut self) -> FmiResult<()>;
    fn new_discrete_states(&mut self) -> FmiResult<EventInfo>;
    fn enter_continuous_time_mode(&mut self) -> FmiResult<()>;
    fn completed_integrator_step(&mut self, no_set_fmu_state_prior: bool)
    -> FmiResult<StepOutcome>;
}

/// Co-simulation: the unit advances itself with its own solver.
pub trait CoSimulation: Fmu {
    fn do_step(
        &mut self,
        current_time: f64,
        step_size: f64,
        no_set_fmu_state_prior: bool,
    ) -> FmiResult<()>;
}

/// A loaded unit of either kind.
pub enum FmuInstance {
    ModelExchange(Box<dyn ModelExchange>),
    CoSimulation(Box<dyn CoSimulation>),
}

impl FmuInstance {
    pub fn fmu(&self) -> &dyn Fmu {
        match self {
            FmuInstance::ModelExchange(me) => me.as_ref(),
            FmuInstance::CoSimulation(cs) => cs.as_ref(),
        }
    }

    pub fn fmu_mut(&mut self) -> &mut dyn Fmu {
        match self {
            FmuInstance::ModelExchange(me) => me.as_mut(),
            FmuInstance::CoSimulation(cs) => cs.as_mut(),
        }
    }

    pub fn is_model_exchange(&self) -> bool {
        matches!(self, FmuInstance::ModelExchange(_))
    }
}

impl fmt::Debug for FmuInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_model_exchange() { "ModelExchange" } else { "CoSimulation" };
        f.debug_struct("FmuInstance")
            .field("kind", &kind)
            .field("model", &self.fmu().description().model_name)
            .finish()
    }
}
