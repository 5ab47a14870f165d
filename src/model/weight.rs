//! Weight codes: the signed integer programmed into a device pair.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Signed device code in `[-128, 127]`.
///
/// The sign selects which device of the antiparallel pair conducts, the
/// magnitude sets how far its resistance drops below `R_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct WeightCode(i16);

impl WeightCode {
    pub const MIN: i64 = -128;
    pub const MAX: i64 = 127;
    /// Full-scale code magnitude used by the resistance model.
    pub const SCALE: f64 = 128.0;

    pub const ZERO: WeightCode = WeightCode(0);

    /// Validate `value` against `[MIN, MAX]`. `edge` names the target for
    /// the error message.
    pub fn checked(edge: &str, value: i64) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(WeightCode(value as i16))
        } else {
            Err(Error::OutOfRange { edge: edge.to_string(), value })
        }
    }

    /// Uniform draw over the whole code range, as an unprogrammed device.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        WeightCode(rng.gen_range(Self::MIN as i16..=Self::MAX as i16))
    }

    pub fn get(self) -> i64 {
        i64::from(self.0)
    }

    /// 1 if the code is strictly positive, else 0.
    pub fn sign_bit(self) -> u8 {
        u8::from(self.0 > 0)
    }

    pub fn magnitude(self) -> f64 {
        f64::from(self.0.unsigned_abs())
    }
}

impl TryFrom<i64> for WeightCode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::checked("<unnamed>", value)
    }
}

impl From<WeightCode> for i64 {
    fn from(code: WeightCode) -> i64 {
        code.get()
    }
}

impl fmt::Display for WeightCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
