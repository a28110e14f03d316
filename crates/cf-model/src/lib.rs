//! cf-model: composite co-simulation models.
//!
//! Provides:
//! - `CompositeModel`: instances, connections and the lifecycle state machine
//! - The stepping loop applying the sorted update plan every communication step
//! - Fixed-point resolution of algebraic loops
//! - Experiment `Settings`, description import/export and a text summary
//!
//! # Example
//!
//! ```
//! use cf_model::{CompositeModel, Settings};
//!
//! let mut model = CompositeModel::new("chain", Settings::default());
//! model.instantiate("builtin:constant", "A")?;
//! model.instantiate("builtin:gain", "B")?;
//! model.add_connection("A.y", "B.u")?;
//! model.initialize()?;
//! model.simulate()?;
//! assert_eq!(model.get_real("B.y")?, 2.0);
//! model.terminate()?;
//! # Ok::<(), cf_model::ModelError>(())
//! ```

pub mod algebraic;
pub mod composite;
pub mod describe;
pub mod error;
pub mod import;
pub mod settings;
pub mod state;

pub use algebraic::{LoopSolution, MAX_ITERATIONS, SignalAccess, solve_loop};
pub use composite::CompositeModel;
pub use error::{ModelError, ModelResult};
pub use import::default_result_file;
pub use settings::Settings;
pub use state::ModelState;
