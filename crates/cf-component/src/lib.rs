//! cf-component: simulation units as seen by the orchestrator.
//!
//! Provides:
//! - `Fmu`, `ModelExchange` and `CoSimulation` capability traits
//! - `ModelDescription`: variables, states and declared dependencies
//! - `ComponentAdapter`: lifecycle, variable access and stepping of one unit
//! - Fixed-step explicit Euler integration with event handling for ME units
//! - `Registry`: in-process loader with the `builtin:` models

pub mod adapter;
pub mod builtin;
pub mod error;
pub mod fmi;
pub mod integrator;
pub mod loader;
pub mod manifest;

pub use adapter::{AdapterPhase, ComponentAdapter, SolverMethod};
pub use error::{ComponentError, ComponentResult};
pub use fmi::{CoSimulation, EventInfo, FmiResult, FmiStatus, Fmu, FmuInstance, ModelExchange, StepOutcome};
pub use integrator::H_DEFAULT;
pub use loader::{ComponentLoader, Registry};
pub use manifest::{
    DefaultExperiment, DerivativeDef, Dependencies, FmuKind, ModelDescription, ScalarVariable,
    Unknown,
};
