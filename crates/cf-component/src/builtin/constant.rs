//! Constant source: `y = value`.

use cf_core::variable::{Causality, Initial, ValueRef};

use super::store::RealStore;
use crate::fmi::{CoSimulation, FmiResult, Fmu};
use crate::manifest::{Dependencies, FmuKind, ModelDescription, ScalarVariable, Unknown};

const VALUE: ValueRef = 0;
const Y: ValueRef = 1;

pub struct Constant {
    description: ModelDescription,
    store: RealStore,
}

impl Constant {
    pub fn new() -> Self {
        let description = ModelDescription {
            model_name: "Constant".into(),
            guid: "{cf-builtin-constant}".into(),
            generation_tool: super::GENERATION_TOOL.into(),
            kind: FmuKind::CoSimulation,
            variables: vec![
                ScalarVariable::real("value", VALUE, Causality::Parameter)
                    .with_start(1.0)
                    .with_initial(Initial::Exact),
                ScalarVariable::real("y", Y, Causality::Output).with_initial(Initial::Calculated),
            ],
            derivatives: vec![],
            outputs: Some(vec![Unknown::new(1, Dependencies::None)]),
            initial_unknowns: Some(vec![Unknown::new(1, Dependencies::None)]),
            number_of_event_indicators: 0,
            default_experiment: None,
        };
        let store = RealStore::new(&description);
        Self { description, store }
    }

    fn update(&mut self) {
        self.store.put(Y, self.store.value(VALUE));
    }
}

impl Default for Constant {
    fn default() -> Self {
        Self::new()
    }
}

impl Fmu for Constant {
    fn description(&self) -> &ModelDescription {
        &self.description
    }

    fn setup_experiment(&mut self, _: Option<f64>, _: f64, _: Option<f64>) -> FmiResult<()> {
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> FmiResult<()> {
        self.update();
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

impl CoSimulation for Constant {
    fn do_step(&mut self, _: f64, _: f64, _: bool) -> FmiResult<()> {
        self.update();
        Ok(())
    }
}
