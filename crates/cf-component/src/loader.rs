//! Resolving model paths to unit instances.

use std::collections::BTreeMap;

use tracing::debug;

use crate::builtin::{BouncingBall, Constant, Gain, Integrator};
use crate::error::{ComponentError, ComponentResult};
use crate::fmi::FmuInstance;

/// Turns a model path into a fresh unit instance.
pub trait ComponentLoader {
    fn load(&self, path: &str, instance: &str) -> ComponentResult<FmuInstance>;
}

type Factory = Box<dyn Fn() -> FmuInstance + Send + Sync>;

/// Loader backed by a table of in-process factories keyed by path.
pub struct Registry {
    factories: BTreeMap<String, Factory>,
}

impl Registry {
    /// Empty registry; every path is unknown.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry preloaded with the `builtin:` models.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("builtin:constant", || {
            FmuInstance::CoSimulation(Box::new(Constant::new()))
        });
        registry.register("builtin:gain", || FmuInstance::CoSimulation(Box::new(Gain::new())));
        registry.register("builtin:integrator", || {
            FmuInstance::ModelExchange(Box::new(Integrator::new()))
        });
        registry.register("builtin:bouncing_ball", || {
            FmuInstance::ModelExchange(Box::new(BouncingBall::new()))
        });
        registry
    }

    /// Add or replace the factory for `path`.
    pub fn register<F>(&mut self, path: impl Into<String>, factory: F)
    where
        F: Fn() -> FmuInstance + Send + Sync + 'static,
    {
        self.factories.insert(path.into(), Box::new(factory));
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ComponentLoader for Registry {
    fn load(&self, path: &str, instance: &str) -> ComponentResult<FmuInstance> {
        let factory = self
            .factories
            .get(path)
            .ok_or_else(|| ComponentError::UnknownModel {
                path: path.to_string(),
            })?;
        debug!("loading {path} as {instance}");
        Ok(factory())
    }
}
