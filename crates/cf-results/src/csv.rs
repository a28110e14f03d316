//! Comma separated result files: a `time,<signal>...` header, then one line
//! per sample.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::recorder::ResultRecorder;
use crate::types::{Row, Trace};
use crate::{ResultsError, ResultsResult};

pub struct CsvWriter {
    path: PathBuf,
    out: Option<BufWriter<File>>,
    width: usize,
    rows: usize,
}

impl CsvWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            out: None,
            width: 0,
            rows: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultRecorder for CsvWriter {
    fn create(&mut self, _start_time: f64, _stop_time: f64, signals: &[String]) -> ResultsResult<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        write!(out, "time")?;
        for s in signals {
            write!(out, ",{s}")?;
        }
        writeln!(out)?;
        self.out = Some(out);
        self.width = signals.len();
        self.rows = 0;
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
        write!(out, "{time}")?;
        for v in values {
            write!(out, ",{v}")?;
        }
        writeln!(out)?;
        self.rows += 1;
        Ok(())
    }

    fn close(&mut self) -> ResultsResult<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
            debug!("wrote {} rows to {}", self.rows, self.path.display());
        }
        Ok(())
    }
}

pub fn load_csv(path: &Path) -> ResultsResult<Trace> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or_else(|| ResultsError::Parse {
        message: "missing header".to_string(),
    })?;
    let mut columns = header.split(',');
    if columns.next() != Some("time") {
        return Err(ResultsError::Parse {
            message: "first column must be time".to_string(),
        });
    }
    let signals: Vec<String> = columns.map(str::to_string).collect();

    let mut rows = Vec::new();
    for (n, line) in lines.enumerate() {
        let parsed: Result<Vec<f64>, _> = line.split(',').map(|f| f.trim().parse::<f64>()).collect();
        let mut fields = parsed.map_err(|e| ResultsError::Parse {
            message: format!("row {}: {e}", n + 1),
        })?;
        if fields.len() != signals.len() + 1 {
            return Err(ResultsError::WidthMismatch {
                expected: signals.len() + 1,
                got: fields.len(),
            });
        }
        let time = fields.remove(0);
        rows.push(Row {
            time,
            values: fields,
        });
    }
    Ok(Trace { signals, rows })
}
