//! Composite model description schema.

use serde::{Deserialize, Serialize};

fn default_version() -> u32 {
    crate::LATEST_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeDef {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub submodels: Vec<SubModelDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
    #[serde(default)]
    pub simulation: SimulationDef,
}

impl CompositeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: name.into(),
            submodels: Vec::new(),
            connections: Vec::new(),
            simulation: SimulationDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubModelDef {
    pub name: String,
    pub model_file: String,
    /// Integration method, model exchange units only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDef {
    pub name: String,
    pub value: f64,
}

/// Signal flow from an output to an input, both as `instance.variable`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default)]
    pub start_time: f64,
    #[serde(default = "default_stop_time")]
    pub stop_time: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_communication_interval")]
    pub communication_interval: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_file: Option<String>,
    /// Regular expression selecting the recorded `instance.variable` signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_filter: Option<String>,
}

fn default_stop_time() -> f64 {
    1.0
}

fn default_tolerance() -> f64 {
    1e-4
}

fn default_communication_interval() -> f64 {
    1e-1
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            stop_time: default_stop_time(),
            tolerance: default_tolerance(),
            communication_interval: default_communication_interval(),
            result_file: None,
            variable_filter: None,
        }
    }
}
