//! Executable signal propagation plan.

use cf_core::Variable;
use std::fmt;

/// One signal-flow edge: copy `output` into `input`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub output: Variable,
    pub input: Variable,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.output, self.input)
    }
}

/// Connections originating in one strongly connected component.
///
/// A group whose component has a single node is a set of plain assignments.
/// Otherwise the group is an algebraic loop and must be iterated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionGroup {
    connections: Vec<Connection>,
    component_size: usize,
}

impl ConnectionGroup {
    pub fn new(connections: Vec<Connection>, component_size: usize) -> Self {
        Self {
            connections,
            component_size,
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Number of graph nodes in the originating component.
    pub fn component_size(&self) -> usize {
        self.component_size
    }

    pub fn is_loop(&self) -> bool {
        self.component_size > 1
    }
}

impl fmt::Display for ConnectionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_loop() {
            write!(f, "{{")?;
            for (i, c) in self.connections.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{c}")?;
            }
            write!(f, "}}")
        } else {
            for (i, c) in self.connections.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{c}")?;
            }
            Ok(())
        }
    }
}
