//! In-process models available through the `builtin:` scheme.
//!
//! | path | kind | behavior |
//! |------|------|----------|
//! | `builtin:constant` | CS | `y = value` |
//! | `builtin:gain` | CS | `y = k * u + offset` |
//! | `builtin:integrator` | ME | `der(x) = u` |
//! | `builtin:bouncing_ball` | ME | falling ball with impact events |

mod bouncing_ball;
mod constant;
mod gain;
mod integrator;
mod store;

pub use bouncing_ball::BouncingBall;
pub use constant::Constant;
pub use gain::Gain;
pub use integrator::Integrator;

pub(crate) const GENERATION_TOOL: &str = "cosimflow builtin";
