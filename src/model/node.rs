//! Nodes of the compact and full (differential) graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which bias supply a bias node belongs to.
///
/// `Left` feeds the visible layer, `Right` feeds the hidden layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rail {
    Left,
    Right,
}

impl Rail {
    pub fn id(self) -> &'static str {
        match self {
            Rail::Left => "L",
            Rail::Right => "R",
        }
    }
}

/// Physical rail polarity of a full-graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Polarity {
    Plus,
    Minus,
}

impl Polarity {
    /// Both polarities, Plus first (the order instances are laid out in).
    pub const BOTH: [Polarity; 2] = [Polarity::Plus, Polarity::Minus];

    /// The `pm` attribute: 1 for Plus, 0 for Minus.
    pub fn pm(self) -> u8 {
        match self {
            Polarity::Plus => 1,
            Polarity::Minus => 0,
        }
    }

    pub fn marker(self) -> char {
        match self {
            Polarity::Plus => '+',
            Polarity::Minus => '-',
        }
    }
}

/// One of the two RBM layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Visible,
    Hidden,
}

impl Layer {
    /// The bias rail wired to this layer.
    pub fn bias_rail(self) -> Rail {
        match self {
            Layer::Visible => Rail::Left,
            Layer::Hidden => Rail::Right,
        }
    }
}

/// A node of the compact graph: `L`, `R`, `V<i>` or `H<j>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompactNode {
    Bias(Rail),
    Visible(usize),
    Hidden(usize),
}

impl CompactNode {
    pub fn is_bias(self) -> bool {
        matches!(self, CompactNode::Bias(_))
    }

    /// Layer and index within it, for non-bias nodes.
    pub fn layer_index(self) -> Option<(Layer, usize)> {
        match self {
            CompactNode::Bias(_) => None,
            CompactNode::Visible(i) => Some((Layer::Visible, i)),
            CompactNode::Hidden(j) => Some((Layer::Hidden, j)),
        }
    }

    pub fn in_layer(layer: Layer, index: usize) -> Self {
        match layer {
            Layer::Visible => CompactNode::Visible(index),
            Layer::Hidden => CompactNode::Hidden(index),
        }
    }

    /// The full-graph instance of this node on the given rail.
    pub fn instance(self, polarity: Polarity) -> FullNode {
        FullNode { node: self, polarity }
    }
}

impl fmt::Display for CompactNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompactNode::Bias(rail) => f.write_str(rail.id()),
            CompactNode::Visible(i) => write!(f, "V{i}"),
            CompactNode::Hidden(j) => write!(f, "H{j}"),
        }
    }
}

/// A rail instance of a compact node in the full graph (`V0+`, `L-`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FullNode {
    /// The `name` attribute: the compact node this instance realizes.
    pub node: CompactNode,
    pub polarity: Polarity,
}

impl FullNode {
    pub fn pm(&self) -> u8 {
        self.polarity.pm()
    }
}

impl fmt::Display for FullNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.node, self.polarity.marker())
    }
}

/// Position of a node in the compact graph's iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompactNodeId(pub usize);

/// Position of a node in the full graph's iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FullNodeId(pub usize);

impl fmt::Display for FullNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
