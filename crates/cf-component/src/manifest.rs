//! Static description of a unit: its variables, state structure and
//! declared dependencies.
//!
//! Variable indices used in [`DerivativeDef`] and [`Unknown`] are 0-based
//! positions in [`ModelDescription::variables`].

use cf_core::variable::{BaseType, Causality, Initial, ValueRef};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FmuKind {
    ModelExchange,
    CoSimulation,
}

impl FmuKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FmuKind::ModelExchange => "ME",
            FmuKind::CoSimulation => "CS",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarVariable {
    pub name: String,
    pub value_ref: ValueRef,
    pub causality: Causality,
    pub base_type: BaseType,
    pub initial: Option<Initial>,
    pub start: Option<f64>,
}

impl ScalarVariable {
    pub fn real(name: impl Into<String>, value_ref: ValueRef, causality: Causality) -> Self {
        Self {
            name: name.into(),
            value_ref,
            causality,
            base_type: BaseType::Real,
            initial: None,
            start: None,
        }
    }

    pub fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_initial(mut self, initial: Initial) -> Self {
        self.initial = Some(initial);
        self
    }
}

/// Links a derivative variable to the state it differentiates. Entry order is
/// the order of the continuous state vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivativeDef {
    pub derivative: usize,
    pub state: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dependencies {
    /// Depends on nothing the orchestrator can set.
    None,
    /// Depends on every input.
    All,
    /// Depends on exactly these variables.
    On(Vec<usize>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unknown {
    pub index: usize,
    pub dependencies: Dependencies,
}

impl Unknown {
    pub fn new(index: usize, dependencies: Dependencies) -> Self {
        Self {
            index,
            dependencies,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefaultExperiment {
    pub start_time: f64,
    pub stop_time: f64,
    pub tolerance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelDescription {
    pub model_name: String,
    pub guid: String,
    pub generation_tool: String,
    pub kind: FmuKind,
    pub variables: Vec<ScalarVariable>,
    pub derivatives: Vec<DerivativeDef>,
    /// `None` when the unit does not declare output dependencies.
    pub outputs: Option<Vec<Unknown>>,
    /// `None` when the unit does not declare initial-unknown dependencies.
    pub initial_unknowns: Option<Vec<Unknown>>,
    pub number_of_event_indicators: usize,
    pub default_experiment: Option<DefaultExperiment>,
}

impl ModelDescription {
    pub fn number_of_states(&self) -> usize {
        self.derivatives.len()
    }

    pub fn variable(&self, name: &str) -> Option<&ScalarVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Check that every index refers to a declared variable.
    pub fn check_indices(&self) -> Result<(), String> {
        let n = self.variables.len();
        let in_range = |i: usize, what: &str| {
            if i < n {
                Ok(())
            } else {
                Err(format!("{what} index {i} out of range ({n} variables)"))
            }
        };
        for d in &self.derivatives {
            in_range(d.derivative, "derivative")?;
            in_range(d.state, "state")?;
        }
        let unknowns = self.outputs.iter().chain(self.initial_unknowns.iter());
        for unknown in unknowns.flatten() {
            in_range(unknown.index, "unknown")?;
            if let Dependencies::On(deps) = &unknown.dependencies {
                for &dep in deps {
                    in_range(dep, "dependency")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> ModelDescription {
        ModelDescription {
            model_name: "m".into(),
            guid: "{0}".into(),
            generation_tool: "test".into(),
            kind: FmuKind::CoSimulation,
            variables: vec![
                ScalarVariable::real("u", 0, Causality::Input),
                ScalarVariable::real("y", 1, Causality::Output),
            ],
            derivatives: vec![],
            outputs: Some(vec![Unknown::new(1, Dependencies::On(vec![0]))]),
            initial_unknowns: None,
            number_of_event_indicators: 0,
            default_experiment: None,
        }
    }

    #[test]
    fn indices_in_range() {
        assert!(description().check_indices().is_ok());
    }

    #[test]
    fn bad_dependency_index() {
        let mut d = description();
        d.outputs = Some(vec![Unknown::new(1, Dependencies::On(vec![5]))]);
        let err = d.check_indices().unwrap_err();
        assert!(err.contains("dependency index 5"));
    }

    #[test]
    fn lookup_by_name() {
        let d = description();
        assert_eq!(d.variable("y").map(|v| v.value_ref), Some(1));
        assert!(d.variable("z").is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn indices_checked_against_variable_count(
                unknown in 0usize..4,
                deps in prop::collection::vec(0usize..4, 0..4),
            ) {
                let mut d = description();
                d.initial_unknowns = Some(vec![Unknown::new(unknown, Dependencies::On(deps.clone()))]);
                let in_range = unknown < 2 && deps.iter().all(|&i| i < 2);
                prop_assert_eq!(d.check_indices().is_ok(), in_range);
            }
        }
    }
}
