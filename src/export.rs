//! Plot hand-off: package a graph for an external visualization layer.
//!
//! A [`PlotFrame`] carries node ids with positions and an optional scalar,
//! plus edges with their name and a scalar, all in the graph's own
//! iteration order. Compact frames default the edge scalar to the weight
//! codes, full frames to the conductances.
//!
//! ```text
//! Network → PlotFrame::compact()/full() → export_json() → plotting layer
//! ```

use std::io::Write;

use serde::Serialize;

use crate::topology::Topology;
use crate::{Error, Network, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Compact,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotEdge {
    /// Index of the first endpoint in `nodes`.
    pub a: usize,
    /// Index of the second endpoint in `nodes`.
    pub b: usize,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFrame {
    pub kind: GraphKind,
    pub nodes: Vec<PlotNode>,
    pub edges: Vec<PlotEdge>,
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if got != expected {
        return Err(Error::InsufficientInput { what, expected, got });
    }
    Ok(())
}

impl PlotFrame {
    /// Compact graph with the current weight codes as edge scalars.
    pub fn compact(network: &Network, node_values: Option<&[f64]>) -> Result<Self> {
        let ks: Vec<f64> = network.ks().into_iter().map(|k| k as f64).collect();
        Self::compact_with(&network.topology(), &ks, node_values)
    }

    /// Full graph with the current conductances as edge scalars.
    pub fn full(network: &Network, node_values: Option<&[f64]>) -> Result<Self> {
        let conductances = network.conductances()?;
        Self::full_with(&network.topology(), &conductances, node_values)
    }

    pub fn compact_with(topology: &Topology, edge_values: &[f64], node_values: Option<&[f64]>) -> Result<Self> {
        let compact = &topology.compact;
        check_len("edge values", compact.edge_count(), edge_values.len())?;
        if let Some(v) = node_values {
            check_len("node values", compact.node_count(), v.len())?;
        }

        let nodes = compact
            .nodes()
            .iter()
            .zip(&topology.compact_positions)
            .enumerate()
            .map(|(i, (node, pos))| PlotNode {
                id: node.to_string(),
                x: pos.x,
                y: pos.y,
                value: node_values.map(|v| v[i]),
            })
            .collect();

        let mut edges = Vec::with_capacity(compact.edge_count());
        for (edge, &value) in compact.edges().iter().zip(edge_values) {
            let index = |n| {
                compact
                    .node_id(n)
                    .map(|id| id.0)
                    .ok_or_else(|| Error::NotFound(format!("compact node {n}")))
            };
            edges.push(PlotEdge { a: index(edge.a)?, b: index(edge.b)?, name: edge.name.clone(), value });
        }

        Ok(Self { kind: GraphKind::Compact, nodes, edges })
    }

    pub fn full_with(topology: &Topology, edge_values: &[f64], node_values: Option<&[f64]>) -> Result<Self> {
        let full = &topology.full;
        check_len("edge values", full.edge_count(), edge_values.len())?;
        if let Some(v) = node_values {
            check_len("node values", full.node_count(), v.len())?;
        }

        let nodes = full
            .nodes()
            .iter()
            .zip(&topology.full_positions)
            .enumerate()
            .map(|(i, (node, pos))| PlotNode {
                id: node.to_string(),
                x: pos.x,
                y: pos.y,
                value: node_values.map(|v| v[i]),
            })
            .collect();

        let edges = full
            .edges()
            .iter()
            .zip(edge_values)
            .map(|(edge, &value)| PlotEdge {
                a: edge.a.0,
                b: edge.b.0,
                name: topology
                    .compact
                    .edge(edge.compact)
                    .map(|e| e.name.clone())
                    .unwrap_or_default(),
                value,
            })
            .collect();

        Ok(Self { kind: GraphKind::Full, nodes, edges })
    }

    /// Write the frame as pretty-printed JSON.
    pub fn export_json(&self, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    #[test]
    fn test_compact_frame() {
        let mut net = Network::new(NetworkConfig::new(2, 1).with_seed(1)).unwrap();
        net.set_code("W10", -7).unwrap();
        let frame = PlotFrame::compact(&net, None).unwrap();
        assert_eq!(frame.nodes.len(), 5);
        assert_eq!(frame.nodes[3].id, "V1");
        assert_eq!(frame.nodes[3].y, -1.0);
        let w10 = &frame.edges[4];
        assert_eq!((w10.a, w10.b, w10.name.as_str(), w10.value), (3, 4, "W10", -7.0));
    }

    #[test]
    fn test_full_frame_names() {
        let net = Network::new(NetworkConfig::new(1, 1).with_seed(1)).unwrap();
        let frame = PlotFrame::full(&net, Some(&[0.0; 8][..])).unwrap();
        let names: Vec<&str> = frame.edges.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["BV0", "BV0", "BH0", "BH0", "W00", "W00", "W00"]);
        assert_eq!(frame.nodes[0].value, Some(0.0));
    }

    #[test]
    fn test_node_value_length_checked() {
        let net = Network::new(NetworkConfig::new(1, 1).with_seed(1)).unwrap();
        assert!(matches!(
            PlotFrame::full(&net, Some(&[0.0; 3][..])),
            Err(Error::InsufficientInput { .. })
        ));
    }

    #[test]
    fn test_export_json() {
        let net = Network::new(NetworkConfig::new(1, 1).with_seed(3)).unwrap();
        let frame = PlotFrame::compact(&net, None).unwrap();
        let mut buf = Vec::new();
        frame.export_json(&mut buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["kind"], "compact");
        assert_eq!(parsed["edges"][2]["name"], "W00");
        assert!(parsed["nodes"][0].get("value").is_none());
    }
}
