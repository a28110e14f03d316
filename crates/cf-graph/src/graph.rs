//! Directed dependency graph over component variables.

use std::cell::OnceCell;
use std::collections::HashMap;

use cf_core::Variable;
use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};
use crate::plan::{Connection, ConnectionGroup};
use crate::scc::strongly_connected_components;

/// Directed graph whose nodes are variables identified by (instance, name).
///
/// Node indices are insertion positions and never change. The sorted
/// connection plan is computed on first request and dropped on every new
/// edge.
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    nodes: Vec<Variable>,
    lookup: HashMap<Variable, usize>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    plan: OnceCell<Vec<ConnectionGroup>>,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `var` unless a node with the same identity exists. Returns the
    /// node index either way.
    pub fn add_variable(&mut self, var: &Variable) -> usize {
        if let Some(&index) = self.lookup.get(var) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(var.clone());
        self.lookup.insert(var.clone(), index);
        self.adjacency.push(Vec::new());
        index
    }

    /// Add the edge `from -> to`, inserting missing endpoints. Adding an edge
    /// that already exists changes nothing.
    pub fn add_edge(&mut self, from: &Variable, to: &Variable) {
        let a = self.add_variable(from);
        let b = self.add_variable(to);
        if self.adjacency[a].contains(&b) {
            return;
        }
        self.adjacency[a].push(b);
        self.edges.push((a, b));
        self.plan.take();
    }

    /// Merge every node and edge of `other`, matching nodes by identity.
    pub fn include_graph(&mut self, other: &DirectedGraph) {
        for var in &other.nodes {
            self.add_variable(var);
        }
        for &(a, b) in &other.edges {
            self.add_edge(&other.nodes[a], &other.nodes[b]);
        }
    }

    pub fn nodes(&self) -> &[Variable] {
        &self.nodes
    }

    /// Edges as (from, to) node index pairs, in insertion order.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> GraphResult<&Variable> {
        self.nodes.get(index).ok_or(GraphError::IndexOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    pub fn index_of(&self, var: &Variable) -> Option<usize> {
        self.lookup.get(var).copied()
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.lookup.contains_key(var)
    }

    pub fn successors(&self, var: &Variable) -> GraphResult<Vec<&Variable>> {
        let index = self.index_of(var).ok_or_else(|| GraphError::UnknownVariable {
            name: var.to_string(),
        })?;
        Ok(self.adjacency[index]
            .iter()
            .map(|&w| &self.nodes[w])
            .collect())
    }

    /// Strongly connected components as node index lists, topologically ordered.
    pub fn sccs(&self) -> Vec<Vec<usize>> {
        strongly_connected_components(&self.adjacency)
    }

    /// Signal-flow plan: output to input connections grouped per strongly
    /// connected component, in dependency order.
    pub fn sorted_connections(&self) -> &[ConnectionGroup] {
        self.plan.get_or_init(|| self.compute_plan())
    }

    fn compute_plan(&self) -> Vec<ConnectionGroup> {
        let mut groups = Vec::new();
        for component in self.sccs() {
            if component.len() > 1 {
                let members: Vec<String> = component
                    .iter()
                    .map(|&i| self.nodes[i].to_string())
                    .collect();
                warn!(
                    "alg. loop (size {}): {}",
                    component.len(),
                    members.join(", ")
                );
            }

            let mut connections = Vec::new();
            for &v in &component {
                let output = &self.nodes[v];
                if !output.is_output() {
                    continue;
                }
                for &w in &self.adjacency[v] {
                    let input = &self.nodes[w];
                    if input.is_input() {
                        connections.push(Connection {
                            output: output.clone(),
                            input: input.clone(),
                        });
                    }
                }
            }

            if !connections.is_empty() {
                groups.push(ConnectionGroup::new(connections, component.len()));
            }
        }
        debug!(
            "sorted {} nodes into {} connection groups",
            self.nodes.len(),
            groups.len()
        );
        groups
    }
}
