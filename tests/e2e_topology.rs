//! End-to-end tests for compact/full topology generation and resizing.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rkm_crossbar::{Network, NetworkConfig, Polarity};

// ============================================================================
// 1. The V=2, H=1 reference network
// ============================================================================

#[test]
fn test_two_visible_one_hidden() {
    let net = Network::new(NetworkConfig::new(2, 1).with_seed(0)).unwrap();
    let t = net.topology();

    let nodes: Vec<String> = t.compact.nodes().iter().map(ToString::to_string).collect();
    assert_eq!(nodes, vec!["L", "R", "V0", "V1", "H0"]);

    let edges: Vec<(String, String, String)> = t
        .compact
        .edges()
        .iter()
        .map(|e| (e.a.to_string(), e.b.to_string(), e.name.clone()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("L".into(), "V0".into(), "BV0".into()),
            ("L".into(), "V1".into(), "BV1".into()),
            ("R".into(), "H0".into(), "BH0".into()),
            ("V0".into(), "H0".into(), "W00".into()),
            ("V1".into(), "H0".into(), "W10".into()),
        ]
    );

    assert_eq!(t.full.node_count(), 10);

    let w00 = t.compact.edge_by_name("W00").unwrap();
    let pairs: Vec<String> = t
        .full
        .expansion(w00.id)
        .iter()
        .map(|id| {
            let (a, b) = t.full.endpoints(&t.full.edges()[id.0]);
            format!("{a},{b}")
        })
        .collect();
    assert_eq!(pairs, vec!["V0+,H0+", "V0+,H0-", "V0-,H0+"]);
}

// ============================================================================
// 2. Node attributes on the full graph
// ============================================================================

#[test]
fn test_full_node_attributes() {
    let net = Network::new(NetworkConfig::new(3, 2).with_seed(0)).unwrap();
    let t = net.topology();
    for node in t.full.nodes() {
        let s = node.to_string();
        assert_eq!(&s[..s.len() - 1], node.node.to_string().as_str());
        assert_eq!(node.pm(), u8::from(node.polarity == Polarity::Plus));
    }
    for node in t.compact.nodes() {
        let instances = t.full.nodes().iter().filter(|n| n.node == *node).count();
        assert_eq!(instances, 2, "{node}");
    }
}

// ============================================================================
// 3. Resize swaps the snapshot
// ============================================================================

#[test]
fn test_resize_rebuilds_and_keeps_old_snapshot() {
    let mut net = Network::new(NetworkConfig::new(2, 1).with_seed(11)).unwrap();
    let before = net.topology();

    net.set_num_hidden(3).unwrap();
    assert_eq!(net.num_hidden(), 3);
    assert_eq!(net.topology().compact.edge_count(), 2 + 3 + 6);
    assert_eq!(net.ks().len(), 11);

    // The old snapshot is untouched.
    assert_eq!(before.compact.edge_count(), 5);
    assert_eq!(before.num_hidden(), 1);

    net.set_num_visible(0).unwrap();
    assert_eq!(net.topology().full.node_count(), 4 + 6);
    assert!(net.code("BV0").is_err());
}

#[test]
fn test_failed_resize_leaves_network_untouched() {
    let mut net = Network::new(NetworkConfig::new(2, 2).with_seed(5)).unwrap();
    let ks = net.ks();
    assert!(net.resize(12, 12).is_err());
    assert_eq!(net.num_visible(), 2);
    assert_eq!(net.ks(), ks);
}

#[test]
fn test_seeded_codes_are_reproducible() {
    let a = Network::new(NetworkConfig::new(4, 3).with_seed(42)).unwrap();
    let b = Network::new(NetworkConfig::new(4, 3).with_seed(42)).unwrap();
    assert_eq!(a.ks(), b.ks());
    assert!(a.ks().iter().all(|k| (-128..=127).contains(k)));
}

// ============================================================================
// 4. Size invariants
// ============================================================================

proptest! {
    #[test]
    fn prop_graph_sizes(v in 0usize..10, h in 0usize..10) {
        let net = Network::new(NetworkConfig::new(v, h).with_seed(1)).unwrap();
        let t = net.topology();
        prop_assert_eq!(t.compact.node_count(), v + h + 2);
        prop_assert_eq!(t.compact.edge_count(), v + h + v * h);
        prop_assert_eq!(t.full.node_count(), 2 * (v + h) + 4);
        prop_assert_eq!(t.full.edge_count(), 2 * (v + h) + 3 * v * h);
        for edge in t.compact.edges() {
            let expected = if edge.kind.is_weight() { 3 } else { 2 };
            prop_assert_eq!(t.full.expansion(edge.id).len(), expected);
        }
    }

    #[test]
    fn prop_layout_is_centered(v in 1usize..10) {
        let net = Network::new(NetworkConfig::new(v, 1).with_seed(1)).unwrap();
        let t = net.topology();
        let ys: Vec<f64> = t.compact.nodes().iter().zip(&t.compact_positions)
            .filter(|(n, _)| n.to_string().starts_with('V'))
            .map(|(_, p)| p.y)
            .collect();
        let sum: f64 = ys.iter().sum();
        prop_assert!(sum.abs() < 1e-9);
        prop_assert!(ys.windows(2).all(|w| w[0] > w[1]));
    }
}
