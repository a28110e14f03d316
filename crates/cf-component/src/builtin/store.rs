use cf_core::variable::ValueRef;

use crate::fmi::{FmiResult, FmiStatus};
use crate::manifest::ModelDescription;

/// Real values of a builtin model, indexed by value reference.
#[derive(Debug, Clone)]
pub(crate) struct RealStore {
    values: Vec<f64>,
    starts: Vec<f64>,
}

impl RealStore {
    pub(crate) fn new(description: &ModelDescription) -> Self {
        let len = description
            .variables
            .iter()
            .map(|v| v.value_ref as usize + 1)
            .max()
            .unwrap_or(0);
        let mut starts = vec![0.0; len];
        for v in &description.variables {
            starts[v.value_ref as usize] = v.start.unwrap_or(0.0);
        }
        Self {
            values: starts.clone(),
            starts,
        }
    }

    pub(crate) fn value(&self, vr: ValueRef) -> f64 {
        self.values[vr as usize]
    }

    pub(crate) fn put(&mut self, vr: ValueRef, value: f64) {
        self.values[vr as usize] = value;
    }

    pub(crate) fn get(&self, vrs: &[ValueRef], out: &mut [f64]) -> FmiResult<()> {
        if vrs.len() != out.len() {
            return Err(FmiStatus::Error);
        }
        for (vr, slot) in vrs.iter().zip(out.iter_mut()) {
            *slot = *self.values.get(*vr as usize).ok_or(FmiStatus::Error)?;
        }
        Ok(())
    }

    pub(crate) fn set(&mut self, vrs: &[ValueRef], values: &[f64]) -> FmiResult<()> {
        if vrs.len() != values.len() {
            return Err(FmiStatus::Error);
        }
        for (vr, value) in vrs.iter().zip(values) {
            let slot = self.values.get_mut(*vr as usize).ok_or(FmiStatus::Error)?;
            *slot = *value;
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.values.copy_from_slice(&self.starts);
    }
}
