//! Error types for component operations.

use cf_core::CoreError;
use thiserror::Error;

use crate::fmi::FmiStatus;

/// Errors raised while driving a single component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("{instance}: {call} returned {status}")]
    Status {
        instance: String,
        call: &'static str,
        status: FmiStatus,
    },

    #[error("{instance}: unknown variable '{name}'")]
    UnknownVariable { instance: String, name: String },

    #[error("{instance}: cannot write '{name}': {what}")]
    InvalidCausality {
        instance: String,
        name: String,
        what: &'static str,
    },

    #[error("{instance}: {what}")]
    InvalidPhase {
        instance: String,
        what: &'static str,
    },

    #[error("{instance}: unsupported solver method '{method}'")]
    UnsupportedSolver { instance: String, method: String },

    #[error("Unknown model '{path}'")]
    UnknownModel { path: String },

    #[error("Invalid model description for {model}: {message}")]
    Manifest { model: String, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

/// Attach the instance and call name to a failing status.
pub(crate) fn on_status<'a>(
    instance: &'a str,
    call: &'static str,
) -> impl FnOnce(FmiStatus) -> ComponentError + 'a {
    move |status| ComponentError::Status {
        instance: instance.to_string(),
        call,
        status,
    }
}

impl ComponentError {
    /// Step failures the component reported as transient. Everything else
    /// leaves the component unusable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ComponentError::Status {
                status: FmiStatus::Discard | FmiStatus::Pending,
                ..
            }
        )
    }
}
