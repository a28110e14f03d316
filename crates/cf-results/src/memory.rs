//! In-memory recorder, mostly for tests and embedding.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::ResultsResult;
use crate::recorder::ResultRecorder;
use crate::types::{Row, Trace};

/// Keeps every sample in a shared [`Trace`]. Clones share the same trace, so
/// a clone kept by the caller sees what the model recorded.
#[derive(Clone, Default)]
pub struct MemoryRecorder {
    trace: Arc<Mutex<Trace>>,
    closed: Arc<Mutex<bool>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn trace(&self) -> MutexGuard<'_, Trace> {
        self.trace.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Trace {
        self.trace().clone()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResultRecorder for MemoryRecorder {
    fn create(&mut self, _start_time: f64, _stop_time: f64, signals: &[String]) -> ResultsResult<()> {
        let mut trace = self.trace();
        trace.signals = signals.to_vec();
        trace.rows.clear();
        drop(trace);
        *self.closed.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = false;
        Ok(())
    }

    fn emit(&mut self, time: f64, values: &[f64]) -> ResultsResult<()> {
        self.trace().rows.push(Row {
            time,
            values: values.to_vec(),
        });
        Ok(())
    }

    fn close(&mut self) -> ResultsResult<()> {
        *self.closed.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_trace() {
        let handle = MemoryRecorder::new();
        let mut recorder = handle.clone();
        recorder.create(0.0, 1.0, &["A.y".into()]).unwrap();
        recorder.emit(0.0, &[1.0]).unwrap();
        recorder.emit(0.5, &[2.0]).unwrap();
        assert!(!handle.is_closed());
        recorder.close().unwrap();

        let trace = handle.snapshot();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.column("A.y"), Some(vec![1.0, 2.0]));
        assert!(handle.is_closed());
    }
}
