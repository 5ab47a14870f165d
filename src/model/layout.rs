//! 2-D layout of both graphs.
//!
//! ```text
//!   x = 0        lrxsep            lrxsep + midxsep     2·lrxsep + midxsep
//!    L ────────── V0 ─────────────── H0 ───────────────── R
//!                 V1
//! ```
//!
//! Layer stacks are centered on y = 0; full-graph rail instances sit
//! `pmsep` above (Plus) and below (Minus) their compact position, bias
//! instances twice that.

use serde::{Deserialize, Serialize};

use super::Polarity;
use crate::{Error, Result};

/// Spacing parameters shared by both layouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Vertical distance between neighbouring layer nodes.
    pub ysep: f64,
    /// Horizontal distance from a bias column to its layer column.
    pub lrxsep: f64,
    /// Horizontal distance between the visible and hidden columns.
    pub midxsep: f64,
    /// Vertical half-gap between the Plus and Minus instance of a node.
    pub pmsep: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self { ysep: 2.0, lrxsep: 2.0, midxsep: 4.0, pmsep: 0.4 }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("ysep", self.ysep),
            ("lrxsep", self.lrxsep),
            ("midxsep", self.midxsep),
            ("pmsep", self.pmsep),
        ] {
            if !v.is_finite() {
                return Err(Error::Config(format!("layout.{name} must be finite, got {v}")));
            }
        }
        Ok(())
    }

    pub fn left_x(&self) -> f64 {
        0.0
    }

    pub fn visible_x(&self) -> f64 {
        self.lrxsep
    }

    pub fn hidden_x(&self) -> f64 {
        self.lrxsep + self.midxsep
    }

    pub fn right_x(&self) -> f64 {
        self.lrxsep * 2.0 + self.midxsep
    }

    /// Compact-graph y of the `index`-th node in a stack of `count`.
    pub fn stack_y(&self, index: usize, count: usize) -> f64 {
        -(index as f64 + stack_start(count)) * self.ysep
    }

    /// Offset of a split layer node's rail instance.
    pub fn rail_offset(&self, polarity: Polarity) -> f64 {
        match polarity {
            Polarity::Plus => self.pmsep,
            Polarity::Minus => -self.pmsep,
        }
    }

    /// Offset of a bias rail instance.
    pub fn bias_offset(&self, polarity: Polarity) -> f64 {
        2.0 * self.rail_offset(polarity)
    }
}

/// Index offset that centers a stack of `count` nodes around y = 0.
pub fn stack_start(count: usize) -> f64 {
    let mid = count as f64 / 2.0;
    if count % 2 == 0 { 0.5 - mid } else { -mid + 0.5 }
}

/// A node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
