//! Result data types.

use serde::{Deserialize, Serialize};

/// Leading record of a result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHeader {
    pub start_time: f64,
    pub stop_time: f64,
    pub signals: Vec<String>,
}

/// Values of every signal at one time point, in header order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub time: f64,
    pub values: Vec<f64>,
}

/// A complete recorded time series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    pub signals: Vec<String>,
    pub rows: Vec<Row>,
}

impl Trace {
    pub fn times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.time).collect()
    }

    /// All samples of one signal, or `None` when it was not recorded.
    pub fn column(&self, signal: &str) -> Option<Vec<f64>> {
        let index = self.signals.iter().position(|s| s == signal)?;
        Some(self.rows.iter().map(|r| r.values[index]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup() {
        let trace = Trace {
            signals: vec!["A.y".into(), "B.u".into()],
            rows: vec![
                Row {
                    time: 0.0,
                    values: vec![1.0, 2.0],
                },
                Row {
                    time: 0.5,
                    values: vec![3.0, 4.0],
                },
            ],
        };
        assert_eq!(trace.column("B.u"), Some(vec![2.0, 4.0]));
        assert_eq!(trace.column("C.x"), None);
        assert_eq!(trace.times(), vec![0.0, 0.5]);
        assert_eq!(trace.len(), 2);
    }
}
