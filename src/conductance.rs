//! Signed weight code → physical conductance.
//!
//! Each full edge is one device of an antiparallel pair. A device conducts
//! only when its polarity agrees with the sign of the programmed code; the
//! other device sits at `R_max`.
//!
//! | `pm` vs. `k > 0` | Resistance |
//! |------------------|------------|
//! | disagree | `R_max` |
//! | agree | `R_max · (1 − |k| / 128)` |
//!
//! `k = 0` has sign bit 0, so the Minus device "agrees" with resistance
//! `R_max` and both branches end up at `1 / R_max`.

use serde::{Deserialize, Serialize};

use crate::model::{Polarity, WeightCode};
use crate::topology::FullGraph;
use crate::{Error, Result};

/// Resistance model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConductanceModel {
    /// Off-state resistance, in resistance-equivalent units.
    pub r_max: f64,
}

impl Default for ConductanceModel {
    fn default() -> Self {
        Self { r_max: 1e5 }
    }
}

impl ConductanceModel {
    pub fn validate(&self) -> Result<()> {
        if !(self.r_max.is_finite() && self.r_max > 0.0) {
            return Err(Error::Config(format!(
                "conductance.r_max must be finite and positive, got {}",
                self.r_max
            )));
        }
        Ok(())
    }

    /// Resistance of the device with polarity `pm` under code `k`.
    ///
    /// `k = -128` on the conducting device gives zero resistance.
    pub fn resistance(&self, pm: Polarity, k: WeightCode) -> f64 {
        if pm.pm() != k.sign_bit() {
            self.r_max
        } else {
            self.r_max * (1.0 - k.magnitude() / WeightCode::SCALE)
        }
    }

    pub fn conductance(&self, pm: Polarity, k: WeightCode) -> f64 {
        1.0 / self.resistance(pm, k)
    }

    /// One conductance per full edge, in full-edge order.
    ///
    /// `codes` is indexed by compact edge id.
    pub fn conductances(&self, full: &FullGraph, codes: &[WeightCode]) -> Result<Vec<f64>> {
        full.edges()
            .iter()
            .map(|edge| {
                let k = codes.get(edge.compact.0).copied().ok_or(Error::InsufficientInput {
                    what: "weight codes",
                    expected: edge.compact.0 + 1,
                    got: codes.len(),
                })?;
                Ok(self.conductance(edge.polarity, k))
            })
            .collect()
    }
}

/// Raw codes in compact-edge order.
pub fn ks(codes: &[WeightCode]) -> Vec<i64> {
    codes.iter().map(|k| k.get()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayoutParams;
    use crate::topology::Topology;

    fn code(k: i64) -> WeightCode {
        WeightCode::checked("test", k).unwrap()
    }

    #[test]
    fn test_zero_code_is_symmetric() {
        let m = ConductanceModel::default();
        assert_eq!(m.conductance(Polarity::Plus, code(0)), 1e-5);
        assert_eq!(m.conductance(Polarity::Minus, code(0)), 1e-5);
    }

    #[test]
    fn test_positive_code() {
        let m = ConductanceModel::default();
        assert_eq!(m.resistance(Polarity::Plus, code(64)), 5e4);
        assert_eq!(m.resistance(Polarity::Minus, code(64)), 1e5);
    }

    #[test]
    fn test_negative_code() {
        let m = ConductanceModel::default();
        assert_eq!(m.resistance(Polarity::Plus, code(-32)), 1e5);
        assert_eq!(m.resistance(Polarity::Minus, code(-32)), 75000.0);
        assert_eq!(m.resistance(Polarity::Minus, code(-128)), 0.0);
        assert!(m.conductance(Polarity::Minus, code(-128)).is_infinite());
    }

    #[test]
    fn test_vector_follows_full_edge_order() {
        let t = Topology::build(2, 1, LayoutParams::default()).unwrap();
        // BV0, BV1, BH0, W00, W10
        let codes = [code(64), code(0), code(-64), code(96), code(-96)];
        let g = ConductanceModel::default().conductances(&t.full, &codes).unwrap();
        assert_eq!(g.len(), t.full.edge_count());
        let expected = [
            1.0 / 5e4, 1e-5,          // L+ → V0+, V1+
            1e-5, 1e-5,               // L- → V0+, V1+
            1e-5,                     // R+ → H0+
            1.0 / 5e4,                // R- → H0+
            1.0 / 25000.0, 1e-5, 1e-5, // W00
            1e-5, 1.0 / 25000.0, 1.0 / 25000.0, // W10
        ];
        assert_eq!(g, expected);
    }

    #[test]
    fn test_short_code_slice() {
        let t = Topology::build(1, 1, LayoutParams::default()).unwrap();
        let err = ConductanceModel::default().conductances(&t.full, &[code(1)]);
        assert!(matches!(err, Err(Error::InsufficientInput { .. })));
    }

    #[test]
    fn test_rejects_bad_r_max() {
        assert!(ConductanceModel { r_max: 0.0 }.validate().is_err());
        assert!(ConductanceModel { r_max: f64::INFINITY }.validate().is_err());
        assert!(ConductanceModel::default().validate().is_ok());
    }
}
