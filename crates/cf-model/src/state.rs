use std::fmt;

/// Lifecycle of a composite model.
///
/// `Instantiated -> Initialization -> Simulation`, and back to `Instantiated`
/// on terminate or reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    Instantiated,
    Initialization,
    Simulation,
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelState::Instantiated => "instantiated",
            ModelState::Initialization => "initializing",
            ModelState::Simulation => "simulating",
        };
        f.write_str(s)
    }
}
