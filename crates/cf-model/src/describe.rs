//! Human readable summary of a composite model.

use std::fmt;

use cf_core::Variable;
use cf_graph::ConnectionGroup;

use crate::composite::CompositeModel;

impl CompositeModel {
    /// Instances, settings and both update plans as plain text.
    pub fn describe(&self) -> String {
        Summary(self).to_string()
    }
}

struct Summary<'a>(&'a CompositeModel);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.0;
        writeln!(out, "Composite model: {}", model.name())?;
        writeln!(out, "State: {}", model.state())?;
        writeln!(out)?;

        for component in model.components() {
            let description = component.description();
            writeln!(
                out,
                "{} ({})",
                component.name(),
                component.kind().as_str()
            )?;
            if let Some(solver) = component.solver_method() {
                writeln!(out, "  solver: {}", solver.as_str())?;
            }
            writeln!(out, "  path: {}", component.path())?;
            writeln!(out, "  GUID: {}", description.guid)?;
            writeln!(out, "  generation tool: {}", description.generation_tool)?;
            write_names(out, "inputs", component.variables().iter().filter(|v| v.is_input()))?;
            write_names(out, "outputs", component.variables().iter().filter(|v| v.is_output()))?;
            write_names(
                out,
                "parameters",
                component.variables().iter().filter(|v| v.is_parameter()),
            )?;
        }

        let s = model.settings();
        writeln!(out)?;
        writeln!(out, "Simulation settings")?;
        writeln!(out, "  start time: {}", s.start_time)?;
        writeln!(out, "  stop time: {}", s.stop_time)?;
        writeln!(out, "  tolerance: {:e}", s.tolerance)?;
        writeln!(out, "  communication interval: {}", s.communication_interval)?;
        match &s.result_file {
            Some(path) => writeln!(out, "  result file: {}", path.display())?,
            None => writeln!(out, "  result file: none")?,
        }
        if let Some(filter) = &s.variable_filter {
            writeln!(out, "  variable filter: {filter}")?;
        }

        writeln!(out)?;
        write_plan(
            out,
            "Initialization order",
            model.initial_unknowns_graph().sorted_connections(),
        )?;
        write_plan(
            out,
            "Simulation order",
            model.outputs_graph().sorted_connections(),
        )
    }
}

fn write_names<'a>(
    out: &mut fmt::Formatter<'_>,
    label: &str,
    vars: impl Iterator<Item = &'a Variable>,
) -> fmt::Result {
    let names: Vec<&str> = vars.map(Variable::name).collect();
    if names.is_empty() {
        writeln!(out, "  {label}: none")
    } else {
        writeln!(out, "  {label}: {}", names.join(", "))
    }
}

fn write_plan(out: &mut fmt::Formatter<'_>, title: &str, plan: &[ConnectionGroup]) -> fmt::Result {
    writeln!(out, "{title}")?;
    if plan.is_empty() {
        return writeln!(out, "  (no connections)");
    }
    for group in plan {
        writeln!(out, "  {group}")?;
    }
    Ok(())
}
