//! `instance.variable` references.

use crate::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// A parsed `instance.variable` reference.
///
/// Only the first `.` separates the two halves, so variable names may contain
/// dots themselves (`A.der(x.y)` is instance `A`, variable `der(x.y)`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub instance: String,
    pub variable: String,
}

impl VarRef {
    pub fn new(instance: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            variable: variable.into(),
        }
    }

    pub fn parse(reference: &str) -> CoreResult<Self> {
        match reference.split_once('.') {
            Some((instance, variable)) if !instance.is_empty() && !variable.is_empty() => {
                Ok(Self::new(instance, variable))
            }
            _ => Err(CoreError::MalformedReference {
                reference: reference.to_string(),
            }),
        }
    }
}

impl FromStr for VarRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.variable)
    }
}
