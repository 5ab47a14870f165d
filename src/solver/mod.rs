//! # Solver Contract
//!
//! The linear solve is an external collaborator. It takes the full graph,
//! one conductance per full edge (full-edge order) and a clamp set, and
//! returns one potential per full node (full-node order).
//!
//! A singular or degenerate system must surface as
//! [`Error::UnsolvableNetwork`](crate::Error::UnsolvableNetwork), never as a
//! NaN-filled vector. The call is blocking and treated as atomic.
//!
//! ## Implementations
//!
//! | Solver | Module | Description |
//! |--------|--------|-------------|
//! | `DenseSolver` | `dense` | Nodal analysis, Gaussian elimination on a dense Laplacian |

pub mod dense;

use std::ops::Index;

use serde::Serialize;

use crate::clamp::ClampSpec;
use crate::model::FullNodeId;
use crate::topology::FullGraph;
use crate::Result;

pub use dense::DenseSolver;

/// The contract between the crossbar model and any linear solver.
pub trait CircuitSolver {
    /// Solve for node potentials with the clamped nodes held fixed.
    fn solve(&self, graph: &FullGraph, conductances: &[f64], clamp: &ClampSpec) -> Result<NodePotentials>;
}

impl<S: CircuitSolver + ?Sized> CircuitSolver for &S {
    fn solve(&self, graph: &FullGraph, conductances: &[f64], clamp: &ClampSpec) -> Result<NodePotentials> {
        (**self).solve(graph, conductances, clamp)
    }
}

/// One potential per full node, in full-node order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePotentials {
    values: Vec<f64>,
}

impl NodePotentials {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: FullNodeId) -> Option<f64> {
        self.values.get(id.0).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// `(node id, potential)` pairs, e.g. `("V0+", 2.4)`.
    pub fn named<'a>(&'a self, graph: &'a FullGraph) -> impl Iterator<Item = (String, f64)> + 'a {
        graph.nodes().iter().zip(&self.values).map(|(n, v)| (n.to_string(), *v))
    }
}

impl Index<FullNodeId> for NodePotentials {
    type Output = f64;

    fn index(&self, id: FullNodeId) -> &f64 {
        &self.values[id.0]
    }
}
