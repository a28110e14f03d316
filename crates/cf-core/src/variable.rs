//! Component variables.
//!
//! A [`Variable`] is identified by its owning instance and its name. The
//! numeric value reference, causality and type are metadata carried along so
//! the orchestrator can route values without going back to the component.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Value reference used by a component to address one of its variables.
pub type ValueRef = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Causality {
    Parameter,
    CalculatedParameter,
    Input,
    Output,
    Local,
    Independent,
}

impl Causality {
    pub fn as_str(self) -> &'static str {
        match self {
            Causality::Parameter => "parameter",
            Causality::CalculatedParameter => "calculatedParameter",
            Causality::Input => "input",
            Causality::Output => "output",
            Causality::Local => "local",
            Causality::Independent => "independent",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    Real,
    Integer,
    Boolean,
    String,
    Enum,
}

/// How the start value of a variable is determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Initial {
    Exact,
    Approx,
    Calculated,
}

#[derive(Clone, Debug)]
pub struct Variable {
    instance: String,
    name: String,
    vr: ValueRef,
    causality: Causality,
    base_type: BaseType,
    initial: Option<Initial>,
    is_state: bool,
}

impl Variable {
    pub fn new(
        instance: impl Into<String>,
        name: impl Into<String>,
        vr: ValueRef,
        causality: Causality,
        base_type: BaseType,
    ) -> Self {
        Self {
            instance: instance.into(),
            name: name.into(),
            vr,
            causality,
            base_type,
            initial: None,
            is_state: false,
        }
    }

    pub fn with_initial(mut self, initial: Initial) -> Self {
        self.initial = Some(initial);
        self
    }

    /// Flag this variable as a continuous state. Done once while the owning
    /// component is set up.
    pub fn mark_as_state(&mut self) {
        self.is_state = true;
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_ref(&self) -> ValueRef {
        self.vr
    }

    pub fn causality(&self) -> Causality {
        self.causality
    }

    pub fn base_type(&self) -> BaseType {
        self.base_type
    }

    pub fn initial(&self) -> Option<Initial> {
        self.initial
    }

    pub fn is_state(&self) -> bool {
        self.is_state
    }

    pub fn is_input(&self) -> bool {
        self.causality == Causality::Input
    }

    pub fn is_output(&self) -> bool {
        self.causality == Causality::Output
    }

    pub fn is_parameter(&self) -> bool {
        self.causality == Causality::Parameter
    }

    pub fn is_calculated_parameter(&self) -> bool {
        self.causality == Causality::CalculatedParameter
    }

    pub fn is_real(&self) -> bool {
        self.base_type == BaseType::Real
    }

    fn initial_is_approx_or_calculated(&self) -> bool {
        matches!(self.initial, Some(Initial::Approx | Initial::Calculated))
    }

    /// True when the variable must be solved for during initialization.
    pub fn is_initial_unknown(&self) -> bool {
        (self.is_output() && self.initial_is_approx_or_calculated())
            || self.is_calculated_parameter()
            || (self.is_state && self.initial_is_approx_or_calculated())
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.instance == other.instance && self.name == other.name
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instance.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.name)
    }
}
