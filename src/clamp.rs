//! Boundary clamping for forward and backward passes.
//!
//! The four bias instances are always pinned to the rails. The driven layer
//! has both rail instances of every node pinned; the other layer floats and
//! is resolved by the solve.

use serde::{Deserialize, Serialize};

use crate::model::{CompactNode, FullNodeId, Layer, Polarity, Rail};
use crate::topology::Topology;
use crate::{Error, Result};

/// Which layer a pass drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Drive the visible layer (`0`).
    Forward,
    /// Drive the hidden layer (`1`).
    Backward,
}

impl Direction {
    pub fn driven_layer(self) -> Layer {
        match self {
            Direction::Forward => Layer::Visible,
            Direction::Backward => Layer::Hidden,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Direction::Forward),
            1 => Ok(Direction::Backward),
            other => Err(Error::Config(format!("direction must be 0 or 1, got {other}"))),
        }
    }
}

/// Analog supply rails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rails {
    pub low: f64,
    pub high: f64,
}

impl Default for Rails {
    fn default() -> Self {
        Self { low: 1.0, high: 3.0 }
    }
}

impl Rails {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn mid(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.low.is_finite() && self.high.is_finite() && self.low < self.high) {
            return Err(Error::Config(format!(
                "rails must be finite with low < high, got [{}, {}]",
                self.low, self.high
            )));
        }
        Ok(())
    }

    fn for_polarity(&self, polarity: Polarity) -> f64 {
        match polarity {
            Polarity::Plus => self.high,
            Polarity::Minus => self.low,
        }
    }
}

/// Fixed-potential nodes handed to the solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClampSpec {
    pub indices: Vec<FullNodeId>,
    pub voltages: Vec<f64>,
}

impl ClampSpec {
    fn push(&mut self, id: FullNodeId, voltage: f64) {
        self.indices.push(id);
        self.voltages.push(voltage);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FullNodeId, f64)> + '_ {
        self.indices.iter().copied().zip(self.voltages.iter().copied())
    }
}

/// Compute the clamp set for a pass.
///
/// Bias instances come first (`L+` high, `L-` low, `R+` high, `R-` low).
/// Then, for each node of the driven layer in index order, its Plus and
/// Minus instance: both at the rail midpoint when the supplied value is
/// exactly zero, otherwise Plus high and Minus low. Only zero vs. nonzero
/// matters; sign and magnitude are ignored.
pub fn clamp(topology: &Topology, direction: Direction, values: &[f64], rails: Rails) -> Result<ClampSpec> {
    let layer = direction.driven_layer();
    let count = topology.compact.layer_size(layer);
    if values.len() < count {
        return Err(Error::InsufficientInput { what: "clamp values", expected: count, got: values.len() });
    }

    let full = &topology.full;
    let lookup = |node: CompactNode, polarity: Polarity| {
        let instance = node.instance(polarity);
        full.node_id(instance).ok_or_else(|| Error::NotFound(format!("full node {instance}")))
    };

    let mut spec = ClampSpec::default();
    for rail in [Rail::Left, Rail::Right] {
        for polarity in Polarity::BOTH {
            spec.push(lookup(CompactNode::Bias(rail), polarity)?, rails.for_polarity(polarity));
        }
    }

    for (index, &value) in values.iter().take(count).enumerate() {
        let node = CompactNode::in_layer(layer, index);
        for polarity in Polarity::BOTH {
            let voltage = if value == 0.0 { rails.mid() } else { rails.for_polarity(polarity) };
            spec.push(lookup(node, polarity)?, voltage);
        }
    }

    tracing::trace!(?direction, clamped = spec.len(), "computed clamp set");
    Ok(spec)
}
