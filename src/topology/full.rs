//! Differential ("push-pull") graph.
//!
//! Every layer node is split into a Plus and a Minus rail instance; the two
//! bias nodes become `L+, L-, R+, R-`. The wiring is deliberately
//! asymmetric and realizes two devices per weight:
//!
//! ```text
//!   L+ ─┐          Vi+ ── Hj+
//!   L- ─┴── Vi+    Vi+ ── Hj-
//!   R+ ─┐          Vi- ── Hj+
//!   R- ─┴── Hj+    (no Vi- ── Hj-)
//! ```
//!
//! Minus instances of layer nodes never touch a bias rail.

use hashbrown::HashMap;
use serde::Serialize;
use smallvec::SmallVec;

use super::CompactGraph;
use crate::model::*;
use crate::{Error, Result};

/// Full edges realizing one compact edge: 2 for bias, 3 for weight.
pub type Expansion = SmallVec<[FullEdgeId; 3]>;

/// The full graph, derived from a [`CompactGraph`].
#[derive(Debug, Clone, Serialize)]
pub struct FullGraph {
    nodes: Vec<FullNode>,
    edges: Vec<FullEdge>,
    #[serde(skip)]
    node_index: HashMap<FullNode, FullNodeId>,
    #[serde(skip)]
    expansion: Vec<Expansion>,
}

struct Builder<'a> {
    compact: &'a CompactGraph,
    node_index: HashMap<FullNode, FullNodeId>,
    edges: Vec<FullEdge>,
    expansion: Vec<Expansion>,
}

impl Builder<'_> {
    fn connect(&mut self, a: FullNode, b: FullNode, polarity: Polarity) -> Result<()> {
        let compact = self
            .compact
            .edge_between(a.node, b.node)
            .ok_or_else(|| Error::NotFound(format!("compact edge ({}, {})", a.node, b.node)))?;
        let lookup = |n: FullNode| {
            self.node_index
                .get(&n)
                .copied()
                .ok_or_else(|| Error::NotFound(format!("full node {n}")))
        };
        let (a, b) = (lookup(a)?, lookup(b)?);
        let id = FullEdgeId(self.edges.len());
        self.edges.push(FullEdge { id, a, b, compact, polarity });
        self.expansion[compact.0].push(id);
        Ok(())
    }
}

/// Build the full graph and its layout from a compact graph.
///
/// Node order: `L+, L-, R+, R-`, then `V0+, V0-, V1+, ...`, then
/// `H0+, H0-, ...`. Edges are ordered by first endpoint in node order,
/// second endpoint in insertion order: `(L±, Vi+)`, `(R±, Hj+)`, then per
/// visible node `(Vi+, Hj+), (Vi+, Hj-)` over `j` and `(Vi-, Hj+)` over `j`.
pub fn generate(
    compact: &CompactGraph,
    compact_positions: &[Position],
    layout: &LayoutParams,
) -> Result<(FullGraph, Vec<Position>)> {
    let num_visible = compact.num_visible();
    let num_hidden = compact.num_hidden();

    let mut nodes = Vec::with_capacity(4 + 2 * (num_visible + num_hidden));
    for rail in [Rail::Left, Rail::Right] {
        for polarity in Polarity::BOTH {
            nodes.push(CompactNode::Bias(rail).instance(polarity));
        }
    }
    for node in compact.nodes().iter().filter(|n| !n.is_bias()) {
        for polarity in Polarity::BOTH {
            nodes.push(node.instance(polarity));
        }
    }

    let mut node_index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if node_index.insert(*node, FullNodeId(i)).is_some() {
            return Err(Error::DuplicateName(node.to_string()));
        }
    }

    let mut builder = Builder {
        compact,
        node_index,
        edges: Vec::with_capacity(2 * (num_visible + num_hidden) + 3 * num_visible * num_hidden),
        expansion: vec![Expansion::new(); compact.edge_count()],
    };

    for (rail, layer) in [(Rail::Left, Layer::Visible), (Rail::Right, Layer::Hidden)] {
        for polarity in Polarity::BOTH {
            for index in 0..compact.layer_size(layer) {
                builder.connect(
                    CompactNode::Bias(rail).instance(polarity),
                    CompactNode::in_layer(layer, index).instance(Polarity::Plus),
                    polarity,
                )?;
            }
        }
    }

    for i in 0..num_visible {
        let vp = CompactNode::Visible(i).instance(Polarity::Plus);
        let vm = CompactNode::Visible(i).instance(Polarity::Minus);
        for j in 0..num_hidden {
            let hidden = CompactNode::Hidden(j);
            builder.connect(vp, hidden.instance(Polarity::Plus), Polarity::Plus)?;
            builder.connect(vp, hidden.instance(Polarity::Minus), Polarity::Minus)?;
        }
        for j in 0..num_hidden {
            builder.connect(vm, CompactNode::Hidden(j).instance(Polarity::Plus), Polarity::Minus)?;
        }
    }

    let mut positions = Vec::with_capacity(nodes.len());
    for node in &nodes {
        let pos = match node.node {
            CompactNode::Bias(rail) => {
                let x = match rail {
                    Rail::Left => layout.left_x(),
                    Rail::Right => layout.right_x(),
                };
                Position::new(x, layout.bias_offset(node.polarity))
            }
            other => {
                let base = compact
                    .node_id(other)
                    .and_then(|id| compact_positions.get(id.0))
                    .ok_or_else(|| Error::NotFound(format!("position of {other}")))?;
                Position::new(base.x, base.y + layout.rail_offset(node.polarity))
            }
        };
        positions.push(pos);
    }

    let Builder { node_index, edges, expansion, .. } = builder;

    tracing::debug!(
        num_visible,
        num_hidden,
        nodes = nodes.len(),
        edges = edges.len(),
        "generated full topology"
    );

    Ok((FullGraph { nodes, edges, node_index, expansion }, positions))
}

impl FullGraph {
    pub fn nodes(&self) -> &[FullNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FullEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: FullNodeId) -> Option<&FullNode> {
        self.nodes.get(id.0)
    }

    pub fn node_id(&self, node: FullNode) -> Option<FullNodeId> {
        self.node_index.get(&node).copied()
    }

    /// Full edges realizing the given compact edge, in full-edge order.
    pub fn expansion(&self, compact: CompactEdgeId) -> &[FullEdgeId] {
        self.expansion.get(compact.0).map(|e| e.as_slice()).unwrap_or(&[])
    }

    /// Endpoint instances of a full edge.
    pub fn endpoints(&self, edge: &FullEdge) -> (FullNode, FullNode) {
        (self.nodes[edge.a.0], self.nodes[edge.b.0])
    }
}
