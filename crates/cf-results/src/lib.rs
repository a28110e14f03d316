//! cf-results: result recording for composite simulations.

pub mod csv;
pub mod jsonl;
pub mod memory;
pub mod recorder;
pub mod types;

pub use csv::{CsvWriter, load_csv};
pub use jsonl::{JsonlWriter, load_jsonl};
pub use memory::MemoryRecorder;
pub use recorder::{ResultRecorder, recorder_for_path};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recorder is not open")]
    NotOpen,

    #[error("Row has {got} values, expected {expected}")]
    WidthMismatch { expected: usize, got: usize },

    #[error("Malformed result file: {message}")]
    Parse { message: String },
}
