//! Static gain with direct feedthrough: `y = k * u + offset`.

use cf_core::variable::{Causality, Initial, ValueRef};

use super::store::RealStore;
use crate::fmi::{CoSimulation, FmiResult, Fmu};
use crate::manifest::{Dependencies, FmuKind, ModelDescription, ScalarVariable, Unknown};

const K: ValueRef = 0;
const OFFSET: ValueRef = 1;
const U: ValueRef = 2;
const Y: ValueRef = 3;

pub struct Gain {
    description: ModelDescription,
    store: RealStore,
}

impl Gain {
    pub fn new() -> Self {
        let description = ModelDescription {
            model_name: "Gain".into(),
            guid: "{cf-builtin-gain}".into(),
            generation_tool: super::GENERATION_TOOL.into(),
            kind: FmuKind::CoSimulation,
            variables: vec![
                ScalarVariable::real("k", K, Causality::Parameter)
                    .with_start(2.0)
                    .with_initial(Initial::Exact),
                ScalarVariable::real("offset", OFFSET, Causality::Parameter)
                    .with_start(0.0)
                    .with_initial(Initial::Exact),
                ScalarVariable::real("u", U, Causality::Input).with_start(0.0),
                ScalarVariable::real("y", Y, Causality::Output).with_initial(Initial::Calculated),
            ],
            derivatives: vec![],
            outputs: Some(vec![Unknown::new(3, Dependencies::On(vec![2]))]),
            initial_unknowns: Some(vec![Unknown::new(3, Dependencies::On(vec![2]))]),
            number_of_event_indicators: 0,
            default_experiment: None,
        };
        let store = RealStore::new(&description);
        Self { description, store }
    }

    fn update(&mut self) {
        let y = self.store.value(K) * self.store.value(U) + self.store.value(OFFSET);
        self.store.put(Y, y);
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new()
    }
}

impl Fmu for Gain {
    fn description(&self) -> &ModelDescription {
        &self.description
    }

    fn setup_experiment(&mut self, _: Option<f64>, _: f64, _: Option<f64>) -> FmiResult<()> {
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> FmiResult<()> {
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

impl CoSimulation for Gain {
    fn do_step(&mut self, _: f64, _: f64, _: bool) -> FmiResult<()> {
        self.update();
        Ok(())
    }
}
