//! Description validation logic.

use std::collections::{HashMap, HashSet};

use cf_core::VarRef;

use crate::schema::{CompositeDef, SimulationDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Malformed reference: {reference} (expected 'instance.variable')")]
    MalformedReference { reference: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_description(def: &CompositeDef) -> Result<(), ValidationError> {
    if def.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: def.version,
        });
    }

    let mut names = HashSet::new();
    for sub in &def.submodels {
        if sub.name.is_empty() || sub.name.contains('.') {
            return Err(ValidationError::InvalidValue {
                field: "submodel name".to_string(),
                value: sub.name.clone(),
                reason: "must be non-empty and contain no '.'".to_string(),
            });
        }
        if !names.insert(sub.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: sub.name.clone(),
                context: "submodels".to_string(),
            });
        }
        let mut params = HashSet::new();
        for p in &sub.parameters {
            if !params.insert(p.name.as_str()) {
                return Err(ValidationError::DuplicateName {
                    name: format!("{}.{}", sub.name, p.name),
                    context: "parameters".to_string(),
                });
            }
            if !p.value.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{}.{}", sub.name, p.name),
                    value: p.value.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
    }

    let mut driven: HashMap<String, &str> = HashMap::new();
    for conn in &def.connections {
        for reference in [&conn.from, &conn.to] {
            let parsed = VarRef::parse(reference).map_err(|_| {
                ValidationError::MalformedReference {
                    reference: reference.clone(),
                }
            })?;
            if !names.contains(parsed.instance.as_str()) {
                return Err(ValidationError::MissingReference {
                    name: parsed.instance,
                    context: format!("connection {} -> {}", conn.from, conn.to),
                });
            }
        }
        if let Some(previous) = driven.insert(conn.to.clone(), conn.from.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: conn.to.clone(),
                context: format!("connection targets (already driven by {previous})"),
            });
        }
    }

    validate_simulation(&def.simulation)
}

fn validate_simulation(sim: &SimulationDef) -> Result<(), ValidationError> {
    let invalid = |field: &str, value: f64, reason: &str| ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    for (field, value) in [
        ("start_time", sim.start_time),
        ("stop_time", sim.stop_time),
        ("tolerance", sim.tolerance),
        ("communication_interval", sim.communication_interval),
    ] {
        if !value.is_finite() {
            return Err(invalid(field, value, "must be finite"));
        }
    }
    if sim.stop_time < sim.start_time {
        return Err(invalid("stop_time", sim.stop_time, "must not precede start_time"));
    }
    if sim.tolerance <= 0.0 {
        return Err(invalid("tolerance", sim.tolerance, "must be positive"));
    }
    if sim.communication_interval <= 0.0 {
        return Err(invalid(
            "communication_interval",
            sim.communication_interval,
            "must be positive",
        ));
    }
    Ok(())
}
