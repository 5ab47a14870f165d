//! # Crossbar Model
//!
//! Plain data shared by the generators, the mapper and the solver.
//! No I/O and no logging here.

pub mod node;
pub mod edge;
pub mod weight;
pub mod layout;

pub use node::{CompactNode, CompactNodeId, FullNode, FullNodeId, Layer, Polarity, Rail};
pub use edge::{CompactEdge, CompactEdgeId, EdgeKind, FullEdge, FullEdgeId};
pub use weight::WeightCode;
pub use layout::{LayoutParams, Position, stack_start};
