//! # rkm-crossbar — Memristive Crossbar RBM Model
//!
//! Models a Restricted Boltzmann Machine realized as an analog crossbar:
//! every weight is a signed integer device code programmed into a pair of
//! antiparallel resistors, and node potentials come out of a
//! boundary-clamped linear solve.
//!
//! ## Design Principles
//!
//! 1. **Two graphs, one snapshot**: the compact graph (one edge per weight)
//!    and the differential full graph (one edge per device) are generated
//!    together into an immutable [`Topology`]
//! 2. **Tagged nodes**: `Bias(rail)`, `Visible(i)`, `Hidden(j)` × `Plus/Minus`
//!    instead of string parsing
//! 3. **Explicit join**: compact edge → full edges is an index built once,
//!    not a name scan
//! 4. **Solver is a seam**: [`CircuitSolver`] is the contract; [`DenseSolver`]
//!    is the reference implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rkm_crossbar::{Network, NetworkConfig, Direction, DenseSolver};
//!
//! # fn example() -> rkm_crossbar::Result<()> {
//! let mut net = Network::new(NetworkConfig::new(2, 1).with_seed(7))?;
//! net.set_code("W00", 96)?;
//! net.set_code("W10", -40)?;
//!
//! let potentials = net.clamp_solve(&DenseSolver::new(), Direction::Forward, &[1.0, 0.0])?;
//! for (node, v) in potentials.named(&net.topology().full) {
//!     println!("{node}: {v:.3}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Generate | `topology` | compact + full graph, layouts |
//! | Map | `conductance` | one conductance per full edge |
//! | Clamp | `clamp` | fixed node indices + voltages |
//! | Solve | `solver` | one potential per full node |
//! | Check | `check` | redundant-encoding consistency |
//! | Plot | `export` | ordered frame for a plotting layer |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod topology;
pub mod conductance;
pub mod clamp;
pub mod check;
pub mod solver;
pub mod config;
pub mod export;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    CompactNode, FullNode, Rail, Polarity, Layer,
    CompactEdge, FullEdge, EdgeKind, WeightCode,
    CompactEdgeId, FullEdgeId, CompactNodeId, FullNodeId,
    LayoutParams, Position,
};
pub use topology::{Topology, CompactGraph, FullGraph};
pub use conductance::ConductanceModel;
pub use clamp::{ClampSpec, Direction, Rails};
pub use check::{EdgeTable, NodeKey};
pub use solver::{CircuitSolver, DenseSolver, NodePotentials};
pub use config::NetworkConfig;
pub use export::PlotFrame;

// ============================================================================
// Top-level Network handle
// ============================================================================

/// A crossbar network: topology snapshot plus programmed weight codes.
///
/// Weight codes are indexed by compact edge id. Resizing builds a new
/// snapshot and draws fresh random codes; nothing is carried over.
#[derive(Debug)]
pub struct Network {
    config: NetworkConfig,
    topology: Arc<Topology>,
    codes: Vec<WeightCode>,
    rng: StdRng,
}

impl Network {
    /// Generate both graphs and assign every edge a random code.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let topology = Topology::build(config.num_visible, config.num_hidden, config.layout)?;
        let codes = random_codes(topology.compact.edge_count(), &mut rng);
        Ok(Self { config, topology: Arc::new(topology), codes, rng })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// The current snapshot. Stays valid across later resizes.
    pub fn topology(&self) -> Arc<Topology> {
        Arc::clone(&self.topology)
    }

    pub fn num_visible(&self) -> usize {
        self.topology.num_visible()
    }

    pub fn num_hidden(&self) -> usize {
        self.topology.num_hidden()
    }

    pub fn set_num_visible(&mut self, num_visible: usize) -> Result<()> {
        self.resize(num_visible, self.num_hidden())
    }

    pub fn set_num_hidden(&mut self, num_hidden: usize) -> Result<()> {
        self.resize(self.num_visible(), num_hidden)
    }

    /// Regenerate both graphs. On error the network is left untouched.
    pub fn resize(&mut self, num_visible: usize, num_hidden: usize) -> Result<()> {
        let topology = Topology::build(num_visible, num_hidden, self.config.layout)?;
        self.codes = random_codes(topology.compact.edge_count(), &mut self.rng);
        self.topology = Arc::new(topology);
        self.config.num_visible = num_visible;
        self.config.num_hidden = num_hidden;
        tracing::debug!(num_visible, num_hidden, "resized network, weight codes reset");
        Ok(())
    }

    // ========================================================================
    // Weight codes
    // ========================================================================

    pub fn codes(&self) -> &[WeightCode] {
        &self.codes
    }

    /// Code of the named compact edge.
    pub fn code(&self, name: &str) -> Result<WeightCode> {
        let edge = self.topology.compact.edge_by_name(name)?;
        Ok(self.codes[edge.id.0])
    }

    /// Program the named compact edge. Fails on unknown names and on codes
    /// outside `[-128, 127]`.
    pub fn set_code(&mut self, name: &str, value: i64) -> Result<()> {
        let id = self.topology.compact.edge_by_name(name)?.id;
        self.codes[id.0] = WeightCode::checked(name, value)?;
        Ok(())
    }

    /// Reprogram codes from a row of named values.
    ///
    /// Keys starting with `B` or `W` are edge names; anything else is
    /// skipped. The whole row is validated before any code changes.
    /// Returns the number of codes written.
    pub fn load_state<I, K>(&mut self, row: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let mut updates = Vec::new();
        for (key, value) in row {
            let key = key.as_ref();
            if !(key.starts_with('B') || key.starts_with('W')) {
                tracing::trace!(key, "skipping non-edge key");
                continue;
            }
            let id = self.topology.compact.edge_by_name(key)?.id;
            updates.push((id, WeightCode::checked(key, value)?));
        }
        for &(id, code) in &updates {
            self.codes[id.0] = code;
        }
        tracing::debug!(written = updates.len(), "loaded weight state");
        Ok(updates.len())
    }

    /// Raw codes in compact-edge order.
    pub fn ks(&self) -> Vec<i64> {
        conductance::ks(&self.codes)
    }

    /// One conductance per full edge, in full-edge order.
    pub fn conductances(&self) -> Result<Vec<f64>> {
        self.config.conductance.conductances(&self.topology.full, &self.codes)
    }

    // ========================================================================
    // Clamp + solve
    // ========================================================================

    /// Clamp set for a pass using the configured rails.
    pub fn clamp(&self, direction: Direction, values: &[f64]) -> Result<ClampSpec> {
        self.clamp_with_rails(direction, values, self.config.rails)
    }

    pub fn clamp_with_rails(&self, direction: Direction, values: &[f64], rails: Rails) -> Result<ClampSpec> {
        rails.validate()?;
        clamp::clamp(&self.topology, direction, values, rails)
    }

    /// Map codes, clamp, and hand the system to `solver`.
    pub fn clamp_solve<S: CircuitSolver>(
        &self,
        solver: &S,
        direction: Direction,
        values: &[f64],
    ) -> Result<NodePotentials> {
        let conductances = self.conductances()?;
        let spec = self.clamp(direction, values)?;
        let potentials = solver.solve(&self.topology.full, &conductances, &spec)?;
        if potentials.len() != self.topology.full.node_count() {
            return Err(Error::UnsolvableNetwork(format!(
                "solver returned {} potentials for {} nodes",
                potentials.len(),
                self.topology.full.node_count()
            )));
        }
        if potentials.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(Error::UnsolvableNetwork("solver returned non-finite potentials".into()));
        }
        Ok(potentials)
    }

    // ========================================================================
    // Consistency
    // ========================================================================

    pub fn edge_table(&self) -> EdgeTable {
        EdgeTable::from_compact(&self.topology.compact)
    }

    /// See [`EdgeTable::check_nodes`].
    pub fn run_node_checks<T>(&self, a: &[T], b: &[T]) -> Result<bool>
    where
        T: PartialEq + std::fmt::Debug,
    {
        self.edge_table().check_nodes(a, b)
    }
}

fn random_codes(count: usize, rng: &mut StdRng) -> Vec<WeightCode> {
    (0..count).map(|_| WeightCode::random(rng)).collect()
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Weight code {value} for {edge} is outside [-128, 127]")]
    OutOfRange { edge: String, value: i64 },

    #[error("Insufficient input: {what} needs {expected} entries, got {got}")]
    InsufficientInput { what: &'static str, expected: usize, got: usize },

    #[error("Unsolvable network: {0}")]
    UnsolvableNetwork(String),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
