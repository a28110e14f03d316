//! Graphviz export.
//!
//! Inputs are drawn red, outputs green. Edges carrying a signal from an output
//! to an input are drawn red; every other dependency edge keeps the default
//! color.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{GraphError, GraphResult};
use crate::graph::DirectedGraph;

impl DirectedGraph {
    pub fn write_dot<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph G {{")?;
        for (i, var) in self.nodes().iter().enumerate() {
            let color = if var.is_input() {
                ", color=\"red\""
            } else if var.is_output() {
                ", color=\"green\""
            } else {
                ""
            };
            writeln!(out, "  {i} [label=\"{var}\"{color}];")?;
        }
        for &(a, b) in self.edges() {
            let nodes = self.nodes();
            if nodes[a].is_output() && nodes[b].is_input() {
                writeln!(out, "  {a} -> {b} [color=\"red\"];")?;
            } else {
                writeln!(out, "  {a} -> {b};")?;
            }
        }
        writeln!(out, "}}")
    }

    pub fn export_dot(&self, path: &Path) -> GraphResult<()> {
        let to_error = |e: io::Error| GraphError::Export {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let file = File::create(path).map_err(to_error)?;
        let mut out = BufWriter::new(file);
        self.write_dot(&mut out).map_err(to_error)?;
        out.flush().map_err(to_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::{BaseType, Causality, Variable};

    #[test]
    fn colors_signal_edges() {
        let y = Variable::new("A", "y", 0, Causality::Output, BaseType::Real);
        let u = Variable::new("B", "u", 0, Causality::Input, BaseType::Real);
        let x = Variable::new("B", "x", 1, Causality::Local, BaseType::Real);

        let mut g = DirectedGraph::new();
        g.add_edge(&y, &u);
        g.add_edge(&u, &x);

        let mut buf = Vec::new();
        g.write_dot(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("digraph G {"));
        assert!(text.contains("0 [label=\"A.y\", color=\"green\"];"));
        assert!(text.contains("1 [label=\"B.u\", color=\"red\"];"));
        assert!(text.contains("2 [label=\"B.x\"];"));
        assert!(text.contains("0 -> 1 [color=\"red\"];"));
        assert!(text.contains("1 -> 2;"));
    }

    #[test]
    fn export_reports_bad_path() {
        let g = DirectedGraph::new();
        let path = std::env::temp_dir()
            .join("cf_graph_missing_dir")
            .join("nested")
            .join("g.dot");
        assert!(matches!(
            g.export_dot(&path),
            Err(GraphError::Export { .. })
        ));
    }
}
