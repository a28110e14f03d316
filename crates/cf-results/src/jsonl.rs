//! JSON-lines result files: a [`RunHeader`] line followed by one [`Row`] per
//! line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::recorder::ResultRecorder;
use crate::types::{Row, RunHeader, Trace};
use crate::{ResultsError, ResultsResult};

pub struct JsonlWriter {
    path: PathBuf,
    out: Option<BufWriter<File>>,
    width: usize,
}

impl JsonlWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            out: None,
            width: 0,
        }
    }
}

impl ResultRecorder for JsonlWriter {
    fn create(&mut self, start_time: f64, stop_time: f64, signals: &[String]) -> ResultsResult<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        let header = RunHeader {
            start_time,
            stop_time,
            signals: signals.to_vec(),
        };
        serde_json::to_writer(&mut out, &header)?;
        out.write_all(b"\n")?;
        self.out = Some(out);
        self.width = signals.len();
        Ok(())
    }

    fn emit(&mut self, time: f64, values: &[f64]) -> ResultsResult<()> {
        let out = self.out.as_mut().ok_or(ResultsError::NotOpen)?;
        if values.len() != self.width {
            return Err(ResultsError::WidthMismatch {
                expected: self.width,
                got: values.len(),
            });
        }
        let row = Row {
            time,
            values: values.to_vec(),
        };
        serde_json::to_writer(&mut *out, &row)?;
        out.write_all(b"\n")?;
        Ok(())
    }

    fn close(&mut self) -> ResultsResult<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
            debug!("closed {}", self.path.display());
        }
        Ok(())
    }
}

pub fn load_jsonl(path: &Path) -> ResultsResult<(RunHeader, Trace)> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let first = lines.next().ok_or_else(|| ResultsError::Parse {
        message: "missing header".to_string(),
    })?;
    let header: RunHeader = serde_json::from_str(first)?;

    let mut rows = Vec::new();
    for line in lines {
        let row: Row = serde_json::from_str(line)?;
        rows.push(row);
    }
    let trace = Trace {
        signals: header.signals.clone(),
        rows,
    };
    Ok((header, trace))
}
