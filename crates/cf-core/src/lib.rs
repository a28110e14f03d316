//! cf-core: shared foundation for cosimflow.
//!
//! Contains:
//! - variable (component variables, causality, initial classification)
//! - reference (`instance.variable` references)
//! - numeric (finiteness checks, time stepping)
//! - timing (per-model phase clocks)
//! - cancel (cooperative cancellation flag)
//! - error (shared error types)

pub mod cancel;
pub mod error;
pub mod numeric;
pub mod reference;
pub mod timing;
pub mod variable;

// Re-exports: nice ergonomics for downstream crates
pub use cancel::CancelToken;
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use reference::VarRef;
pub use timing::{Phase, PhaseClocks};
pub use variable::{BaseType, Causality, Initial, Variable};
