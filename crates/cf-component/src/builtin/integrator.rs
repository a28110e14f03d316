//! Pure integrator: `der(x) = u`, `x(t0) = x0`.

use cf_core::variable::{Causality, Initial, ValueRef};

use super::store::RealStore;
use crate::fmi::{EventInfo, FmiResult, FmiStatus, Fmu, ModelExchange, StepOutcome};
use crate::manifest::{
    DefaultExperiment, DerivativeDef, Dependencies, FmuKind, ModelDescription, ScalarVariable,
    Unknown,
};

const X0: ValueRef = 0;
const U: ValueRef = 1;
const X: ValueRef = 2;
const DER_X: ValueRef = 3;

pub struct Integrator {
    description: ModelDescription,
    store: RealStore,
    time: f64,
}

impl Integrator {
    pub fn new() -> Self {
        let description = ModelDescription {
            model_name: "Integrator".into(),
            guid: "{cf-builtin-integrator}".into(),
            generation_tool: super::GENERATION_TOOL.into(),
            kind: FmuKind::ModelExchange,
            variables: vec![
                ScalarVariable::real("x0", X0, Causality::Parameter)
                    .with_start(0.0)
                    .with_initial(Initial::Exact),
                ScalarVariable::real("u", U, Causality::Input).with_start(0.0),
                ScalarVariable::real("x", X, Causality::Output).with_initial(Initial::Calculated),
                ScalarVariable::real("der(x)", DER_X, Causality::Local)
                    .with_initial(Initial::Calculated),
            ],
            derivatives: vec![DerivativeDef {
                derivative: 3,
                state: 2,
            }],
            outputs: Some(vec![Unknown::new(2, Dependencies::None)]),
            initial_unknowns: Some(vec![Unknown::new(2, Dependencies::None)]),
            number_of_event_indicators: 0,
            default_experiment: Some(DefaultExperiment {
                start_time: 0.0,
                stop_time: 1.0,
                tolerance: 1e-6,
            }),
        };
        let store = RealStore::new(&description);
        Self {
            description,
            store,
            time: 0.0,
        }
    }

    fn update(&mut self) {
        self.store.put(DER_X, self.store.value(U));
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Fmu for Integrator {
    fn description(&self) -> &ModelDescription {
        &self.description
    }

    fn setup_experiment(&mut self, _: Option<f64>, start_time: f64, _: Option<f64>) -> FmiResult<()> {
        self.time = start_time;
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> FmiResult<()> {
        self.store.put(X, self.store.value(X0));
        Ok(())
    }

    fn exit_initialization_mode(&mut self) -> FmiResult<()> {
        Ok(())
    }

    fn terminate(&mut self) -> FmiResult<()> {
        Ok(())
    }

    fn reset(&mut self) -> FmiResult<()> {
        self.store.reset();
        self.time = 0.0;
        Ok(())
    }

    fn get_real(&mut self, vrs: &[ValueRef], values: &mut [f64]) -> FmiResult<()> {
        self.update();
        self.store.get(vrs, values)
    }

    fn set_real(&mut self, vrs: &[ValueRef], values: &[f64]) -> FmiResult<()> {
        self.store.set(vrs, values)
    }
}

impl ModelExchange for Integrator {
    fn set_time(&mut self, time: f64) -> FmiResult<()> {
        self.time = time;
        Ok(())
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> FmiResult<()> {
        let [x] = states else {
            return Err(FmiStatus::Error);
        };
        self.store.put(X, *x);
        Ok(())
    }

    fn get_continuous_states(&mut self, states: &mut [f64]) -> FmiResult<()> {
        self.store.get(&[X], states)
    }

    fn get_derivatives(&mut self, derivatives: &mut [f64]) -> FmiResult<()> {
        self.update();
        self.store.get(&[DER_X], derivatives)
    }

    fn get_event_indicators(&mut self, indicators: &mut [f64]) -> FmiResult<()> {
        if indicators.is_empty() {
            Ok(())
        } else {
            Err(FmiStatus::Error)
        }
    }

    fn enter_event_mode(&mut self) -> FmiResult<()> {
        Ok(())
    }

    fn new_discrete_states(&mut self) -> FmiResult<EventInfo> {
        Ok(EventInfo::default())
    }

    fn enter_continuous_time_mode(&mut self) -> FmiResult<()> {
        Ok(())
    }

    fn completed_integrator_step(&mut self, _: bool) -> FmiResult<StepOutcome> {
        Ok(StepOutcome::default())
    }
}
