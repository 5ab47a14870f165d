//! Network configuration.
//!
//! ```json
//! {
//!   "num_visible": 4,
//!   "num_hidden": 2,
//!   "rails": { "low": 1.0, "high": 3.0 },
//!   "conductance": { "r_max": 100000.0 },
//!   "seed": 7
//! }
//! ```
//!
//! Every field is optional; missing ones take the defaults below.

use serde::{Deserialize, Serialize};

use crate::clamp::Rails;
use crate::conductance::ConductanceModel;
use crate::model::LayoutParams;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub num_visible: usize,
    pub num_hidden: usize,
    pub layout: LayoutParams,
    /// Default rails for clamping.
    pub rails: Rails,
    pub conductance: ConductanceModel,
    /// Seed for the initial random weight codes. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            num_visible: 2,
            num_hidden: 1,
            layout: LayoutParams::default(),
            rails: Rails::default(),
            conductance: ConductanceModel::default(),
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn new(num_visible: usize, num_hidden: usize) -> Self {
        Self { num_visible, num_hidden, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_rails(mut self, rails: Rails) -> Self {
        self.rails = rails;
        self
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.rails.validate()?;
        self.conductance.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_partial_json() {
        let c = NetworkConfig::from_json(r#"{"num_visible": 4, "seed": 7}"#).unwrap();
        assert_eq!(c.num_visible, 4);
        assert_eq!(c.num_hidden, 1);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.rails, Rails::default());
        assert_eq!(c.layout.pmsep, 0.4);
    }

    #[test]
    fn test_nested_defaults() {
        let c = NetworkConfig::from_json(r#"{"layout": {"ysep": 3.0}, "rails": {"high": 5.0}}"#).unwrap();
        assert_eq!(c.layout.ysep, 3.0);
        assert_eq!(c.layout.midxsep, 4.0);
        assert_eq!(c.rails, Rails::new(1.0, 5.0));
    }

    #[test]
    fn test_invalid_rails() {
        let err = NetworkConfig::from_json(r#"{"rails": {"low": 2.0, "high": 2.0}}"#);
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(NetworkConfig::from_json("{"), Err(Error::Json(_))));
    }
}
