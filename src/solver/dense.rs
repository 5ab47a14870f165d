//! Reference solver: Kirchhoff's current law on a dense Laplacian.
//!
//! With `L` the conductance-weighted Laplacian of the full graph, split into
//! free (`f`) and clamped (`c`) nodes, the free potentials satisfy
//!
//! ```text
//!   L_ff · v_f = −L_fc · v_c
//! ```
//!
//! The free block is solved by Gaussian elimination with partial pivoting.
//! A floating node or island (no conductive path to a clamp) makes `L_ff`
//! singular and is reported as an unsolvable network.

use ndarray::{Array1, Array2};

use super::{CircuitSolver, NodePotentials};
use crate::clamp::ClampSpec;
use crate::topology::FullGraph;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct DenseSolver {
    /// Pivots below `pivot_tolerance · max|L_ii|` count as zero.
    pub pivot_tolerance: f64,
}

impl Default for DenseSolver {
    fn default() -> Self {
        Self { pivot_tolerance: 1e-12 }
    }
}

impl DenseSolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn laplacian(graph: &FullGraph, conductances: &[f64]) -> Result<Array2<f64>> {
        if conductances.len() != graph.edge_count() {
            return Err(Error::UnsolvableNetwork(format!(
                "{} conductances for {} edges",
                conductances.len(),
                graph.edge_count()
            )));
        }
        let n = graph.node_count();
        let mut lap = Array2::<f64>::zeros((n, n));
        for (edge, &g) in graph.edges().iter().zip(conductances) {
            if !g.is_finite() || g < 0.0 {
                let (a, b) = graph.endpoints(edge);
                return Err(Error::UnsolvableNetwork(format!("conductance {g} on edge {a}-{b}")));
            }
            let (a, b) = (edge.a.0, edge.b.0);
            lap[[a, a]] += g;
            lap[[b, b]] += g;
            lap[[a, b]] -= g;
            lap[[b, a]] -= g;
        }
        Ok(lap)
    }

    /// Clamp voltage per node, `None` where free.
    fn fixed(graph: &FullGraph, clamp: &ClampSpec) -> Result<Vec<Option<f64>>> {
        if clamp.indices.len() != clamp.voltages.len() {
            return Err(Error::UnsolvableNetwork(format!(
                "{} clamp indices with {} voltages",
                clamp.indices.len(),
                clamp.voltages.len()
            )));
        }
        let mut fixed = vec![None; graph.node_count()];
        for (id, v) in clamp.iter() {
            if !v.is_finite() {
                return Err(Error::UnsolvableNetwork(format!("clamp voltage {v} on node {id}")));
            }
            let slot = fixed
                .get_mut(id.0)
                .ok_or_else(|| Error::UnsolvableNetwork(format!("clamp index {id} out of range")))?;
            match *slot {
                Some(prev) if prev != v => {
                    return Err(Error::UnsolvableNetwork(format!(
                        "node {id} clamped to both {prev} and {v}"
                    )));
                }
                _ => *slot = Some(v),
            }
        }
        Ok(fixed)
    }

    /// Solve `a · x = b` in place. Consumes both.
    fn eliminate(&self, mut a: Array2<f64>, mut b: Array1<f64>, scale: f64) -> Result<Array1<f64>> {
        let m = b.len();
        let threshold = self.pivot_tolerance * scale;

        for col in 0..m {
            let (pivot_row, pivot) = (col..m)
                .map(|r| (r, a[[r, col]].abs()))
                .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if !(pivot > threshold) {
                tracing::warn!(col, pivot, "floating or shorted node, system is singular");
                return Err(Error::UnsolvableNetwork(format!(
                    "singular system: pivot {pivot:e} in column {col}"
                )));
            }
            if pivot_row != col {
                for j in 0..m {
                    a.swap([pivot_row, j], [col, j]);
                }
                b.swap(pivot_row, col);
            }
            for r in col + 1..m {
                let factor = a[[r, col]] / a[[col, col]];
                if factor == 0.0 {
                    continue;
                }
                for j in col..m {
                    a[[r, j]] -= factor * a[[col, j]];
                }
                b[r] -= factor * b[col];
            }
        }

        let mut x = Array1::<f64>::zeros(m);
        for r in (0..m).rev() {
            let tail: f64 = (r + 1..m).map(|j| a[[r, j]] * x[j]).sum();
            x[r] = (b[r] - tail) / a[[r, r]];
        }
        Ok(x)
    }
}

impl CircuitSolver for DenseSolver {
    fn solve(&self, graph: &FullGraph, conductances: &[f64], clamp: &ClampSpec) -> Result<NodePotentials> {
        let lap = Self::laplacian(graph, conductances)?;
        let fixed = Self::fixed(graph, clamp)?;

        let free: Vec<usize> = (0..fixed.len()).filter(|&i| fixed[i].is_none()).collect();
        let m = free.len();

        let mut a = Array2::<f64>::zeros((m, m));
        let mut b = Array1::<f64>::zeros(m);
        for (r, &i) in free.iter().enumerate() {
            for (c, &j) in free.iter().enumerate() {
                a[[r, c]] = lap[[i, j]];
            }
            b[r] = -fixed
                .iter()
                .enumerate()
                .filter_map(|(j, v)| v.map(|v| lap[[i, j]] * v))
                .sum::<f64>();
        }

        let scale = lap.diag().iter().fold(0.0_f64, |acc, d| acc.max(d.abs())).max(f64::MIN_POSITIVE);
        let x = if m == 0 { Array1::zeros(0) } else { self.eliminate(a, b, scale)? };

        let mut values: Vec<f64> = fixed.iter().map(|v| v.unwrap_or(0.0)).collect();
        for (&i, &v) in free.iter().zip(x.iter()) {
            values[i] = v;
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::UnsolvableNetwork(format!("non-finite potential at node {bad}")));
        }

        tracing::debug!(nodes = values.len(), free = m, clamped = clamp.len(), "solved network");
        Ok(NodePotentials::new(values))
    }
}
