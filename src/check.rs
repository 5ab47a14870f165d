//! Consistency check over the redundant differential encoding.
//!
//! The edge table records, per compact edge, which logical node plays the
//! "A" role and which the "B" role. Every value attached to the same node
//! across all edges must agree. Bias edges share the pseudo-node `A0` as
//! their A role, so both bias supplies must report the same value too.

use std::fmt;

use serde::Serialize;

use crate::model::{CompactNode, EdgeKind, Polarity};
use crate::solver::NodePotentials;
use crate::topology::{CompactGraph, Topology};
use crate::{Error, Result};

/// A logical node as seen by the edge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKey {
    /// Shared A role of every bias edge (`A0`).
    BiasSupply,
    Node(CompactNode),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::BiasSupply => f.write_str("A0"),
            NodeKey::Node(n) => write!(f, "{n}"),
        }
    }
}

/// One row per compact edge, in compact-edge order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRow {
    pub name: String,
    pub is_weight: bool,
    pub a: NodeKey,
    pub b: NodeKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeTable {
    rows: Vec<EdgeRow>,
    /// Every key appearing in an A or B role, sorted and deduplicated.
    nodes: Vec<NodeKey>,
}

impl EdgeTable {
    pub fn from_compact(compact: &CompactGraph) -> Self {
        let rows: Vec<EdgeRow> = compact
            .edges()
            .iter()
            .map(|edge| {
                let a = match edge.kind {
                    EdgeKind::Bias { .. } => NodeKey::BiasSupply,
                    EdgeKind::Weight { .. } => NodeKey::Node(edge.a),
                };
                EdgeRow { name: edge.name.clone(), is_weight: edge.kind.is_weight(), a, b: NodeKey::Node(edge.b) }
            })
            .collect();

        let mut nodes: Vec<NodeKey> = rows.iter().flat_map(|r| [r.a, r.b]).collect();
        nodes.sort_unstable();
        nodes.dedup();

        Self { rows, nodes }
    }

    pub fn rows(&self) -> &[EdgeRow] {
        &self.rows
    }

    pub fn nodes(&self) -> &[NodeKey] {
        &self.nodes
    }

    /// True when, for every node, all values attached to it agree.
    ///
    /// `a[e]` is the value at edge `e`'s A endpoint, `b[e]` at its B
    /// endpoint. Every node is checked; failures are logged individually.
    pub fn check_nodes<T>(&self, a: &[T], b: &[T]) -> Result<bool>
    where
        T: PartialEq + fmt::Debug,
    {
        for (what, got) in [("A assignments", a.len()), ("B assignments", b.len())] {
            if got < self.rows.len() {
                return Err(Error::InsufficientInput { what, expected: self.rows.len(), got });
            }
        }

        let mut consistent = true;
        for node in &self.nodes {
            let mut values = self
                .rows
                .iter()
                .enumerate()
                .filter(|(_, r)| r.a == *node)
                .map(|(e, _)| &a[e])
                .chain(
                    self.rows.iter().enumerate().filter(|(_, r)| r.b == *node).map(|(e, _)| &b[e]),
                );
            let Some(first) = values.next() else { continue };
            if let Some(other) = values.find(|v| *v != first) {
                tracing::debug!(%node, ?first, ?other, "inconsistent node assignment");
                consistent = false;
            }
        }
        Ok(consistent)
    }

    /// Per-edge (A, B) assignments derived from a solve.
    ///
    /// A logical node's value is its Plus potential minus its Minus
    /// potential; `A0` takes the span of the edge's own bias supply.
    pub fn endpoint_assignments(
        &self,
        topology: &Topology,
        potentials: &NodePotentials,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        let full = &topology.full;
        if potentials.len() < full.node_count() {
            return Err(Error::InsufficientInput {
                what: "node potentials",
                expected: full.node_count(),
                got: potentials.len(),
            });
        }
        let differential = |node: CompactNode| -> Result<f64> {
            let mut v = [0.0; 2];
            for (slot, polarity) in v.iter_mut().zip(Polarity::BOTH) {
                let instance = node.instance(polarity);
                let id = full
                    .node_id(instance)
                    .ok_or_else(|| Error::NotFound(format!("full node {instance}")))?;
                *slot = potentials[id];
            }
            Ok(v[0] - v[1])
        };

        let mut a = Vec::with_capacity(self.rows.len());
        let mut b = Vec::with_capacity(self.rows.len());
        for (row, edge) in self.rows.iter().zip(topology.compact.edges()) {
            a.push(differential(edge.a)?);
            let NodeKey::Node(node) = row.b else {
                return Err(Error::NotFound(format!("B role of {}", row.name)));
            };
            b.push(differential(node)?);
        }
        Ok((a, b))
    }
}
