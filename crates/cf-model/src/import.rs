//! Building models from declarative descriptions and exporting them back.

use std::path::{Path, PathBuf};

use cf_component::{ComponentLoader, Registry};
use cf_project::{CompositeDef, ConnectionDef, ParameterDef, SubModelDef, validate_description};
use tracing::info;

use crate::composite::CompositeModel;
use crate::error::ModelResult;
use crate::settings::Settings;

impl CompositeModel {
    /// Instantiate every submodel of `def`, then apply solvers, parameters,
    /// connections and settings.
    pub fn from_description(
        def: &CompositeDef,
        loader: Box<dyn ComponentLoader>,
    ) -> ModelResult<Self> {
        validate_description(def).map_err(cf_project::ProjectError::from)?;

        let settings = Settings::from(&def.simulation);
        settings.validate()?;
        let mut model = CompositeModel::with_loader(&def.name, settings, loader);

        for sub in &def.submodels {
            model.instantiate(&sub.model_file, &sub.name)?;
            if let Some(solver) = &sub.solver {
                model.set_solver_method(&sub.name, solver)?;
            }
            for p in &sub.parameters {
                model.set_real(&format!("{}.{}", sub.name, p.name), p.value)?;
            }
        }
        for c in &def.connections {
            model.add_connection(&c.from, &c.to)?;
        }
        info!(
            "loaded {} ({} submodels, {} connections)",
            def.name,
            def.submodels.len(),
            def.connections.len()
        );
        Ok(model)
    }

    /// Load a YAML or JSON description resolving models with the builtin
    /// registry.
    pub fn load(path: &Path) -> ModelResult<Self> {
        Self::load_with_loader(path, Box::new(Registry::with_builtins()))
    }

    /// Load a description file. Without a configured result file the results
    /// go to `<stem>_res.csv` in the working directory.
    pub fn load_with_loader(path: &Path, loader: Box<dyn ComponentLoader>) -> ModelResult<Self> {
        let mut def = cf_project::load(path)?;
        if def.simulation.result_file.is_none() {
            def.simulation.result_file = Some(default_result_file(path).display().to_string());
        }
        Self::from_description(&def, loader)
    }

    /// Snapshot of the model as a description: submodels in name order,
    /// connections in the order they were added.
    pub fn to_description(&self) -> CompositeDef {
        let mut def = CompositeDef::new(self.name.clone());
        def.simulation = (&self.settings).into();

        for (name, component) in &self.components {
            let parameters = self
                .parameters
                .iter()
                .filter(|(r, _)| r.instance == *name)
                .map(|(r, value)| ParameterDef {
                    name: r.variable.clone(),
                    value: *value,
                })
                .collect();
            def.submodels.push(SubModelDef {
                name: name.clone(),
                model_file: component.path().to_string(),
                solver: self.solvers.get(name).map(|s| s.as_str().to_string()),
                parameters,
            });
        }
        def.connections = self
            .connections
            .iter()
            .map(|(from, to)| ConnectionDef {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();
        def
    }

    /// Write the description; the extension selects YAML or JSON.
    pub fn save(&self, path: &Path) -> ModelResult<()> {
        cf_project::save(path, &self.to_description())?;
        info!("saved {} to {}", self.name, path.display());
        Ok(())
    }
}

/// `<stem>_res.csv` for a description file path.
pub fn default_result_file(description: &Path) -> PathBuf {
    let stem = description
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    PathBuf::from(format!("{stem}_res.csv"))
}
