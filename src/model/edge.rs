//! Edges of the compact and full graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CompactNode, FullNodeId, Layer, Polarity};

/// Position of an edge in the compact graph's iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompactEdgeId(pub usize);

/// Position of an edge in the full graph's iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FullEdgeId(pub usize);

impl fmt::Display for CompactEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a compact edge connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Bias supply → layer node.
    Bias { layer: Layer, index: usize },
    /// Visible `i` ↔ hidden `j` crossbar device.
    Weight { visible: usize, hidden: usize },
}

impl EdgeKind {
    pub fn is_weight(self) -> bool {
        matches!(self, EdgeKind::Weight { .. })
    }

    /// The edge name: `B<target>` or `W<i><j>`.
    ///
    /// Indices are concatenated without a separator, so names collide once
    /// an index reaches two digits (`W1` + `11` == `W11` + `1`).
    pub fn name(self) -> String {
        match self {
            EdgeKind::Bias { layer, index } => format!("B{}", CompactNode::in_layer(layer, index)),
            EdgeKind::Weight { visible, hidden } => format!("W{visible}{hidden}"),
        }
    }
}

/// An edge of the compact graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactEdge {
    pub id: CompactEdgeId,
    /// Bias node for bias edges, visible node for weight edges.
    pub a: CompactNode,
    /// Layer node for bias edges, hidden node for weight edges.
    pub b: CompactNode,
    pub kind: EdgeKind,
    pub name: String,
}

impl CompactEdge {
    pub fn new(id: CompactEdgeId, kind: EdgeKind) -> Self {
        let (a, b) = match kind {
            EdgeKind::Bias { layer, index } => {
                (CompactNode::Bias(layer.bias_rail()), CompactNode::in_layer(layer, index))
            }
            EdgeKind::Weight { visible, hidden } => {
                (CompactNode::Visible(visible), CompactNode::Hidden(hidden))
            }
        };
        Self { id, a, b, kind, name: kind.name() }
    }

    pub fn endpoints(&self) -> (CompactNode, CompactNode) {
        (self.a, self.b)
    }
}

/// An edge of the full graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullEdge {
    pub id: FullEdgeId,
    pub a: FullNodeId,
    pub b: FullNodeId,
    /// The compact edge this device realizes (the `name` back-reference).
    pub compact: CompactEdgeId,
    /// Bias edges: the bias endpoint's polarity. Weight edges: Plus iff both
    /// endpoints share a polarity.
    pub polarity: Polarity,
}

impl FullEdge {
    pub fn pm(&self) -> u8 {
        self.polarity.pm()
    }
}
