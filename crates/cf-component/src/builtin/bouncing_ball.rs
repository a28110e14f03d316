//! Ball falling onto a floor, losing energy on every impact.
//!
//! States `h` and `v`; the single event indicator is the height.

use cf_core::variable::{Causality, Initial, ValueRef};

use super::store::RealStore;
use crate::fmi::{EventInfo, FmiResult, FmiStatus, Fmu, ModelExchange, StepOutcome};
use crate::manifest::{
    DefaultExperiment, DerivativeDef, Dependencies, FmuKind, ModelDescription, ScalarVariable,
    Unknown,
};

const G: ValueRef = 0;
const E: ValueRef = 1;
const H0: ValueRef = 2;
const H: ValueRef = 3;
const V: ValueRef = 4;
const DER_H: ValueRef = 5;
const DER_V: ValueRef = 6;

pub struct BouncingBall {
    description: ModelDescription,
    store: RealStore,
    time: f64,
    bounces: u32,
}

impl BouncingBall {
    pub fn new() -> Self {
        let description = ModelDescription {
            model_name: "BouncingBall".into(),
            guid: "{cf-builtin-bouncing-ball}".into(),
            generation_tool: super::GENERATION_TOOL.into(),
            kind: FmuKind::ModelExchange,
            variables: vec![
                ScalarVariable::real("g", G, Causality::Parameter)
                    .with_start(9.81)
                    .with_initial(Initial::Exact),
                ScalarVariable::real("e", E, Causality::Parameter)
                    .with_start(0.7)
                    .with_initial(Initial::Exact),
                ScalarVariable::real("h0", H0, Causality::Parameter)
                    .with_start(1.0)
                    .with_initial(Initial::Exact),
                ScalarVariable::real("h", H, Causality::Output).with_initial(Initial::Calculated),
                ScalarVariable::real("v", V, Causality::Output).with_initial(Initial::Calculated),
                ScalarVariable::real("der(h)", DER_H, Causality::Local)
                    .with_initial(Initial::Calculated),
                ScalarVariable::real("der(v)", DER_V, Causality::Local)
                    .with_initial(Initial::Calculated),
            ],
            derivatives: vec![
                DerivativeDef {
                    derivative: 5,
                    state: 3,
                },
                DerivativeDef {
                    derivative: 6,
                    state: 4,
                },
            ],
            outputs: Some(vec![
                Unknown::new(3, Dependencies::None),
                Unknown::new(4, Dependencies::None),
            ]),
            initial_unknowns: Some(vec![
                Unknown::new(3, Dependencies::None),
                Unknown::new(4, Dependencies::None),
            ]),
            number_of_event_indicators: 1,
            default_experiment: Some(DefaultExperiment {
                start_time: 0.0,
                stop_time: 3.0,
                tolerance: 1e-6,
            }),
        };
        let store = RealStore::new(&description);
        Self {
            description,
            store,
            time: 0.0,
            bounces: 0,
        }
    }

    /// Number of impacts handled so far.
    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    fn update(&mut self) {
        self.store.put(DER_H, self.store.value(V));
        self.store.put(DER_V, -self.store.value(G));
    }
}

impl Default for BouncingBall {
    fn default() -> Self {
        Self::new()
    }
}

impl Fmu for BouncingBall {
    fn description(&self) -> &ModelDescription {
        &self.description
    }

    fn setup_experiment(&mut self, _: Option<f64>, start_time: f64, _: Option<f64>) -> FmiResult<()> {
        self.time = start_time;
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> FmiResult<()> {
        self.store.put(H, self.store.value(H0));
        self.store.put(V, 0.0);
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
        self.bounces = 0;
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

impl ModelExchange for BouncingBall {
    fn set_time(&mut self, time: f64) -> FmiResult<()> {
        self.time = time;
        Ok(())
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> FmiResult<()> {
        let [h, v] = states else {
            return Err(FmiStatus::Error);
        };
        self.store.put(H, *h);
        self.store.put(V, *v);
        Ok(())
    }

    fn get_continuous_states(&mut self, states: &mut [f64]) -> FmiResult<()> {
        self.store.get(&[H, V], states)
    }

    fn get_derivatives(&mut self, derivatives: &mut [f64]) -> FmiResult<()> {
        self.update();
        self.store.get(&[DER_H, DER_V], derivatives)
    }

    fn get_event_indicators(&mut self, indicators: &mut [f64]) -> FmiResult<()> {
        let [z] = indicators else {
            return Err(FmiStatus::Error);
        };
        *z = self.store.value(H);
        Ok(())
    }

    fn enter_event_mode(&mut self) -> FmiResult<()> {
        Ok(())
    }

    fn new_discrete_states(&mut self) -> FmiResult<EventInfo> {
        let (h, v) = (self.store.value(H), self.store.value(V));
        if h <= 0.0 && v < 0.0 {
            // mirror the overshoot so the indicator is strictly positive again
            self.store.put(H, (-h).max(f64::MIN_POSITIVE));
            self.store.put(V, -self.store.value(E) * v);
            self.bounces += 1;
        }
        Ok(EventInfo {
            values_of_continuous_states_changed: true,
            ..EventInfo::default()
        })
    }

    fn enter_continuous_time_mode(&mut self) -> FmiResult<()> {
        Ok(())
    }

    fn completed_integrator_step(&mut self, _: bool) -> FmiResult<StepOutcome> {
        Ok(StepOutcome::default())
    }
}
