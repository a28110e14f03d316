//! Graph-specific error types.

/// Dependency graph lookup and export errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The variable is not a node of this graph.
    UnknownVariable { name: String },

    /// A node index past the end of the node list.
    IndexOutOfRange { index: usize, len: usize },

    /// Writing a graph description failed.
    Export { path: String, message: String },
}

pub type GraphResult<T> = Result<T, GraphError>;

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownVariable { name } => {
                write!(f, "Variable {} is not part of the graph", name)
            }
            GraphError::IndexOutOfRange { index, len } => {
                write!(f, "Node index {} out of range (len={})", index, len)
            }
            GraphError::Export { path, message } => {
                write!(f, "Failed to export graph to {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for GraphError {}
