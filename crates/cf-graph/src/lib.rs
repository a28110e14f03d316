//! cf-graph: variable dependency graph for cosimflow.
//!
//! Provides:
//! - `DirectedGraph` over component variables with identity de-duplication
//! - Iterative Tarjan SCC decomposition in topological order
//! - The sorted connection plan used to propagate signals each step
//! - Graphviz export for diagnostics
//!
//! # Example
//!
//! ```
//! use cf_core::{BaseType, Causality, Variable};
//! use cf_graph::DirectedGraph;
//!
//! let y = Variable::new("A", "y", 0, Causality::Output, BaseType::Real);
//! let u = Variable::new("B", "u", 0, Causality::Input, BaseType::Real);
//!
//! let mut graph = DirectedGraph::new();
//! graph.add_edge(&y, &u);
//!
//! let plan = graph.sorted_connections();
//! assert_eq!(plan.len(), 1);
//! assert!(!plan[0].is_loop());
//! ```

pub mod dot;
pub mod error;
pub mod graph;
pub mod plan;
pub mod scc;

pub use error::{GraphError, GraphResult};
pub use graph::DirectedGraph;
pub use plan::{Connection, ConnectionGroup};
pub use scc::strongly_connected_components;
