//! Experiment settings of a composite model.

use std::path::PathBuf;

use cf_project::SimulationDef;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Experiment configuration. Frozen once the model is initialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Start time (seconds)
    pub start_time: f64,
    /// Stop time (seconds)
    pub stop_time: f64,
    /// Relative tolerance handed to the units and used by the loop solver
    pub tolerance: f64,
    /// Time between data exchanges (seconds)
    pub communication_interval: f64,
    /// Result file; the extension selects the format. `None` records nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_file: Option<PathBuf>,
    /// Regular expression over `instance.variable`. Only signals whose whole
    /// name matches are recorded; `None` records every real variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            stop_time: 1.0,
            tolerance: 1e-4,
            communication_interval: 1e-1,
            result_file: None,
            variable_filter: None,
        }
    }
}

impl Settings {
    pub fn with_stop_time(mut self, stop_time: f64) -> Self {
        self.stop_time = stop_time;
        self
    }

    pub fn with_communication_interval(mut self, interval: f64) -> Self {
        self.communication_interval = interval;
        self
    }

    pub fn with_result_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_file = Some(path.into());
        self
    }

    pub fn with_variable_filter(mut self, pattern: impl Into<String>) -> Self {
        self.variable_filter = Some(pattern.into());
        self
    }

    /// Compiled variable filter, anchored at both ends.
    pub fn signal_filter(&self) -> ModelResult<Option<Regex>> {
        self.variable_filter
            .as_deref()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|e| ModelError::InvalidFilter {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn validate(&self) -> ModelResult<()> {
        let finite = self.start_time.is_finite()
            && self.stop_time.is_finite()
            && self.tolerance.is_finite()
            && self.communication_interval.is_finite();
        if !finite {
            return Err(ModelError::InvalidSettings {
                what: "times, tolerance and interval must be finite",
            });
        }
        if self.stop_time < self.start_time {
            return Err(ModelError::InvalidSettings {
                what: "stop time precedes start time",
            });
        }
        if self.tolerance <= 0.0 {
            return Err(ModelError::InvalidSettings {
                what: "tolerance must be positive",
            });
        }
        if self.communication_interval <= 0.0 {
            return Err(ModelError::InvalidSettings {
                what: "communication interval must be positive",
            });
        }
        self.signal_filter()?;
        Ok(())
    }
}

impl From<&SimulationDef> for Settings {
    fn from(def: &SimulationDef) -> Self {
        Self {
            start_time: def.start_time,
            stop_time: def.stop_time,
            tolerance: def.tolerance,
            communication_interval: def.communication_interval,
            result_file: def.result_file.as_ref().map(PathBuf::from),
            variable_filter: def.variable_filter.clone(),
        }
    }
}

impl From<&Settings> for SimulationDef {
    fn from(settings: &Settings) -> Self {
        Self {
            start_time: settings.start_time,
            stop_time: settings.stop_time,
            tolerance: settings.tolerance,
            communication_interval: settings.communication_interval,
            result_file: settings
                .result_file
                .as_ref()
                .map(|p| p.display().to_string()),
            variable_filter: settings.variable_filter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn rejects_inconsistent_values() {
        let s = Settings::default().with_stop_time(-1.0);
        assert!(s.validate().is_err());
        let s = Settings::default().with_communication_interval(0.0);
        assert!(s.validate().is_err());
        let s = Settings {
            tolerance: f64::NAN,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn variable_filter_matches_whole_names() {
        let s = Settings::default().with_variable_filter("A\\.y|B\\..*");
        let filter = s.signal_filter().unwrap().unwrap();
        assert!(filter.is_match("A.y"));
        assert!(filter.is_match("B.u"));
        assert!(!filter.is_match("A.y2"));
        assert!(!filter.is_match("CA.y"));
        assert!(Settings::default().signal_filter().unwrap().is_none());
    }

    #[test]
    fn rejects_malformed_filter() {
        let s = Settings::default().with_variable_filter("A.(y");
        assert!(matches!(
            s.validate(),
            Err(ModelError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn converts_to_and_from_description() {
        let s = Settings::default()
            .with_stop_time(2.0)
            .with_result_file("run_res.csv")
            .with_variable_filter("A\\..*");
        let def = SimulationDef::from(&s);
        assert_eq!(def.result_file.as_deref(), Some("run_res.csv"));
        assert_eq!(def.variable_filter.as_deref(), Some("A\\..*"));
        assert_eq!(Settings::from(&def), s);
    }
}
