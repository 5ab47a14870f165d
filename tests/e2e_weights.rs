//! End-to-end tests for weight programming and the conductance mapping.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rkm_crossbar::{Error, Network, NetworkConfig};

fn network(v: usize, h: usize) -> Network {
    Network::new(NetworkConfig::new(v, h).with_seed(9)).unwrap()
}

// ============================================================================
// 1. Setter / accessor
// ============================================================================

#[test]
fn test_unknown_edge_name() {
    let mut net = network(2, 1);
    assert!(matches!(net.set_code("W01", 3), Err(Error::NotFound(_))));
    assert!(matches!(net.code("BX0"), Err(Error::NotFound(_))));
    // No prefix matching.
    assert!(matches!(net.set_code("W0", 3), Err(Error::NotFound(_))));
}

#[test]
fn test_out_of_range_code() {
    let mut net = network(2, 1);
    let before = net.code("W00").unwrap();
    let err = net.set_code("W00", 128).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { value: 128, .. }));
    assert!(err.to_string().contains("W00"));
    assert!(net.set_code("W00", -129).is_err());
    assert_eq!(net.code("W00").unwrap(), before);
}

#[test]
fn test_ks_follow_compact_order() {
    let mut net = network(2, 1);
    for (name, k) in [("BV0", 1), ("BV1", 2), ("BH0", 3), ("W00", 4), ("W10", 5)] {
        net.set_code(name, k).unwrap();
    }
    assert_eq!(net.ks(), vec![1, 2, 3, 4, 5]);
}

// ============================================================================
// 2. load_state
// ============================================================================

#[test]
fn test_load_state_skips_non_edge_keys() {
    let mut net = network(2, 1);
    let mut row = HashMap::new();
    row.insert("W00".to_string(), -17);
    row.insert("BH0".to_string(), 64);
    row.insert("epoch".to_string(), 12);
    row.insert("V0".to_string(), 1);

    assert_eq!(net.load_state(row).unwrap(), 2);
    assert_eq!(net.code("W00").unwrap().get(), -17);
    assert_eq!(net.code("BH0").unwrap().get(), 64);
}

#[test]
fn test_load_state_is_all_or_nothing() {
    let mut net = network(2, 1);
    let before = net.ks();
    let row = vec![("W00", 5), ("W10", 500)];
    assert!(matches!(net.load_state(row), Err(Error::OutOfRange { .. })));
    assert_eq!(net.ks(), before);

    let row = vec![("W00", 5), ("W99", 1)];
    assert!(matches!(net.load_state(row), Err(Error::NotFound(_))));
    assert_eq!(net.ks(), before);
}

// ============================================================================
// 3. Conductances
// ============================================================================

#[test]
fn test_zero_code_gives_r_max_on_both_branches() {
    let mut net = network(1, 1);
    net.load_state([("BV0", 0), ("BH0", 0), ("W00", 0)]).unwrap();
    let g = net.conductances().unwrap();
    assert_eq!(g.len(), net.topology().full.edge_count());
    assert!(g.iter().all(|&x| x == 1e-5));
}

#[test]
fn test_conductance_per_branch() {
    let mut net = network(1, 1);
    net.load_state([("BV0", 0), ("BH0", 0), ("W00", 64)]).unwrap();
    let t = net.topology();
    let w00 = t.compact.edge_by_name("W00").unwrap();
    let g = net.conductances().unwrap();
    let branch: Vec<f64> = t.full.expansion(w00.id).iter().map(|id| g[id.0]).collect();
    // (V0+,H0+) conducts, the crossed pair stays off.
    assert_eq!(branch, vec![1.0 / 5e4, 1e-5, 1e-5]);

    net.set_code("W00", -64).unwrap();
    let g = net.conductances().unwrap();
    let branch: Vec<f64> = t.full.expansion(w00.id).iter().map(|id| g[id.0]).collect();
    assert_eq!(branch, vec![1e-5, 1.0 / 5e4, 1.0 / 5e4]);
}

proptest! {
    #[test]
    fn prop_code_round_trip(v in -128i64..=127) {
        let mut net = network(2, 2);
        net.set_code("W11", v).unwrap();
        prop_assert_eq!(net.code("W11").unwrap().get(), v);
        net.set_code("BV1", v).unwrap();
        prop_assert_eq!(net.code("BV1").unwrap().get(), v);
    }

    #[test]
    fn prop_conductance_bounds(k in -127i64..=127) {
        let mut net = network(1, 1);
        net.load_state([("BV0", 0), ("BH0", 0), ("W00", k)]).unwrap();
        for g in net.conductances().unwrap() {
            prop_assert!(g >= 1e-5);
            prop_assert!(g <= 128.0 / 1e5);
        }
    }
}
