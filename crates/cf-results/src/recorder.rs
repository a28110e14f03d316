//! Recorder interface and selection by file extension.

use std::path::Path;

use tracing::warn;

use crate::ResultsResult;
use crate::csv::CsvWriter;
use crate::jsonl::JsonlWriter;

/// Sink for the sampled values of a running simulation.
///
/// `create` is called once with the names of all recorded signals, `emit`
/// once per sample with values in the same order, `close` at the end.
pub trait ResultRecorder {
    fn create(&mut self, start_time: f64, stop_time: f64, signals: &[String]) -> ResultsResult<()>;
    fn emit(&mut self, time: f64, values: &[f64]) -> ResultsResult<()>;
    fn close(&mut self) -> ResultsResult<()>;
}

/// File recorder matching the extension of `path`. Unsupported extensions
/// are reported and yield `None`.
pub fn recorder_for_path(path: &Path) -> Option<Box<dyn ResultRecorder>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => Some(Box::new(CsvWriter::new(path))),
        Some("jsonl") => Some(Box::new(JsonlWriter::new(path))),
        _ => {
            warn!(
                "unsupported result file format {}; no results will be recorded",
                path.display()
            );
            None
        }
    }
}
