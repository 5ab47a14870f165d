//! # Topology Generation
//!
//! Both graphs are rebuilt from scratch for a given layer size and bundled
//! into an immutable [`Topology`] snapshot. Resizing a network swaps the
//! snapshot; anyone still holding the old `Arc<Topology>` keeps a
//! consistent view of the previous shape.

pub mod compact;
pub mod full;

use serde::Serialize;

use crate::model::{LayoutParams, Position};
use crate::Result;

pub use compact::CompactGraph;
pub use full::{Expansion, FullGraph};

/// Compact + full graph with their layouts.
#[derive(Debug, Clone, Serialize)]
pub struct Topology {
    pub compact: CompactGraph,
    pub compact_positions: Vec<Position>,
    pub full: FullGraph,
    pub full_positions: Vec<Position>,
    pub layout: LayoutParams,
}

impl Topology {
    pub fn build(num_visible: usize, num_hidden: usize, layout: LayoutParams) -> Result<Self> {
        layout.validate()?;
        let (compact, compact_positions) = compact::generate(num_visible, num_hidden, &layout)?;
        let (full, full_positions) = full::generate(&compact, &compact_positions, &layout)?;
        Ok(Self { compact, compact_positions, full, full_positions, layout })
    }

    pub fn num_visible(&self) -> usize {
        self.compact.num_visible()
    }

    pub fn num_hidden(&self) -> usize {
        self.compact.num_hidden()
    }
}
