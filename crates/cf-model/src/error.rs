//! Error types for composite model operations.

use cf_component::ComponentError;
use cf_core::CoreError;
use cf_graph::GraphError;
use cf_project::ProjectError;
use cf_results::ResultsError;
use thiserror::Error;

use crate::state::ModelState;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid state: {operation} is not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: ModelState,
    },

    #[error("Unknown instance '{name}'")]
    UnknownInstance { name: String },

    #[error("Unknown variable '{reference}'")]
    UnknownVariable { reference: String },

    #[error("Instance '{name}' already exists")]
    DuplicateInstance { name: String },

    #[error("Invalid instance name '{name}'")]
    InvalidName { name: String },

    #[error("Cannot set '{reference}': {what}")]
    NotSettable {
        reference: String,
        what: &'static str,
    },

    #[error("Algebraic loop not solved after {iterations} iterations (residual {residual:e})")]
    AlgebraicLoop { iterations: usize, residual: f64 },

    #[error("Invalid settings: {what}")]
    InvalidSettings { what: &'static str },

    #[error("Invalid variable filter '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("Cancelled at t={time}")]
    Cancelled { time: f64 },

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Result file error: {0}")]
    Results(#[from] ResultsError),

    #[error("Description error: {0}")]
    Project(#[from] ProjectError),
}

pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    /// Transient component step failures; the step may be attempted again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Component(e) => e.is_retryable(),
            ModelError::Cancelled { .. } => true,
            _ => false,
        }
    }
}
