//! cf-project: declarative composite model descriptions and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_description};

pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: String },
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<CompositeDef> {
    let content = std::fs::read_to_string(path)?;
    let def: CompositeDef = serde_yaml::from_str(&content)?;
    validate_description(&def)?;
    Ok(def)
}

pub fn save_yaml(path: &std::path::Path, def: &CompositeDef) -> ProjectResult<()> {
    validate_description(def)?;
    let content = serde_yaml::to_string(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<CompositeDef> {
    let content = std::fs::read_to_string(path)?;
    let def: CompositeDef = serde_json::from_str(&content)?;
    validate_description(&def)?;
    Ok(def)
}

pub fn save_json(path: &std::path::Path, def: &CompositeDef) -> ProjectResult<()> {
    validate_description(def)?;
    let content = serde_json::to_string_pretty(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn extension(path: &std::path::Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Load a description, choosing the format from the file extension.
pub fn load(path: &std::path::Path) -> ProjectResult<CompositeDef> {
    match extension(path).as_deref() {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Save a description, choosing the format from the file extension.
pub fn save(path: &std::path::Path, def: &CompositeDef) -> ProjectResult<()> {
    match extension(path).as_deref() {
        Some("yaml" | "yml") => save_yaml(path, def),
        Some("json") => save_json(path, def),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}
