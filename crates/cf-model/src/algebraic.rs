//! Fixed-point resolution of algebraic loops.
//!
//! A loop group is iterated Gauss-Seidel style: each output is read and
//! written to its paired input in plan order, so later pairs already see the
//! inputs written earlier in the same sweep. After a sweep every output is
//! read again; the sweep converged when no output moved by more than the
//! tolerance from the value just written.

use cf_core::Variable;
use cf_graph::{Connection, ConnectionGroup};
use tracing::debug;

use crate::error::{ModelError, ModelResult};

/// Sweeps allowed before a loop counts as unsolvable.
pub const MAX_ITERATIONS: usize = 10;

/// Read/write access to the signals a plan connects.
pub trait SignalAccess {
    fn read(&mut self, var: &Variable) -> ModelResult<f64>;
    fn write(&mut self, var: &Variable, value: f64) -> ModelResult<()>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopSolution {
    pub iterations: usize,
    pub residual: f64,
}

/// Copy every output of `connections` into its input, in order.
pub fn assign(access: &mut dyn SignalAccess, connections: &[Connection]) -> ModelResult<()> {
    for c in connections {
        let value = access.read(&c.output)?;
        access.write(&c.input, value)?;
    }
    Ok(())
}

pub fn solve_loop(
    access: &mut dyn SignalAccess,
    group: &ConnectionGroup,
    tolerance: f64,
) -> ModelResult<LoopSolution> {
    let connections = group.connections();
    let mut written = vec![0.0; connections.len()];
    let mut residual = f64::INFINITY;

    for iteration in 1..=MAX_ITERATIONS {
        for (slot, c) in written.iter_mut().zip(connections) {
            let value = access.read(&c.output)?;
            access.write(&c.input, value)?;
            *slot = value;
        }

        residual = 0.0;
        for (value, c) in written.iter().zip(connections) {
            residual = f64::max(residual, (access.read(&c.output)? - value).abs());
        }

        if residual <= tolerance {
            debug!("alg. loop solved in {iteration} iterations (residual {residual:e})");
            return Ok(LoopSolution {
                iterations: iteration,
                residual,
            });
        }
    }

    Err(ModelError::AlgebraicLoop {
        iterations: MAX_ITERATIONS,
        residual,
    })
}

/// Run a whole plan: plain groups are assigned, loops are iterated.
pub fn propagate(
    access: &mut dyn SignalAccess,
    plan: &[ConnectionGroup],
    tolerance: f64,
) -> ModelResult<()> {
    for group in plan {
        if group.is_loop() {
            solve_loop(access, group, tolerance)?;
        } else {
            assign(access, group.connections())?;
        }
    }
    Ok(())
}
