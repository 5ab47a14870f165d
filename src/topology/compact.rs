//! Compact bipartite graph: bias, visible and hidden nodes with one edge per
//! logical weight or bias.

use hashbrown::HashMap;
use serde::Serialize;

use crate::model::*;
use crate::{Error, Result};

/// The compact graph. Built once by [`generate`], never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CompactGraph {
    num_visible: usize,
    num_hidden: usize,
    nodes: Vec<CompactNode>,
    edges: Vec<CompactEdge>,
    #[serde(skip)]
    node_index: HashMap<CompactNode, CompactNodeId>,
    #[serde(skip)]
    name_index: HashMap<String, CompactEdgeId>,
    #[serde(skip)]
    endpoint_index: HashMap<(CompactNode, CompactNode), CompactEdgeId>,
}

/// Build the compact graph and its layout.
///
/// Node order: `L, R, V0..V(n-1), H0..H(m-1)`. Edge order: every `(L, Vi)`,
/// every `(R, Hj)`, then `(Vi, Hj)` row-major.
///
/// Fails with [`Error::DuplicateName`] when two edges would share a name.
pub fn generate(
    num_visible: usize,
    num_hidden: usize,
    layout: &LayoutParams,
) -> Result<(CompactGraph, Vec<Position>)> {
    let mut nodes = Vec::with_capacity(2 + num_visible + num_hidden);
    nodes.push(CompactNode::Bias(Rail::Left));
    nodes.push(CompactNode::Bias(Rail::Right));
    nodes.extend((0..num_visible).map(CompactNode::Visible));
    nodes.extend((0..num_hidden).map(CompactNode::Hidden));

    let mut kinds = Vec::with_capacity(num_visible + num_hidden + num_visible * num_hidden);
    kinds.extend((0..num_visible).map(|index| EdgeKind::Bias { layer: Layer::Visible, index }));
    kinds.extend((0..num_hidden).map(|index| EdgeKind::Bias { layer: Layer::Hidden, index }));
    for visible in 0..num_visible {
        for hidden in 0..num_hidden {
            kinds.push(EdgeKind::Weight { visible, hidden });
        }
    }

    let edges: Vec<CompactEdge> = kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| CompactEdge::new(CompactEdgeId(i), kind))
        .collect();

    let mut node_index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if node_index.insert(*node, CompactNodeId(i)).is_some() {
            return Err(Error::DuplicateName(node.to_string()));
        }
    }

    let mut name_index = HashMap::with_capacity(edges.len());
    let mut endpoint_index = HashMap::with_capacity(edges.len());
    for edge in &edges {
        if let Some(prev) = name_index.insert(edge.name.clone(), edge.id) {
            let other = &edges[prev.0];
            return Err(Error::DuplicateName(format!(
                "edge name {} is shared by ({}, {}) and ({}, {})",
                edge.name, other.a, other.b, edge.a, edge.b,
            )));
        }
        endpoint_index.insert(edge.endpoints(), edge.id);
    }

    let positions = nodes
        .iter()
        .map(|node| match *node {
            CompactNode::Bias(Rail::Left) => Position::new(layout.left_x(), 0.0),
            CompactNode::Bias(Rail::Right) => Position::new(layout.right_x(), 0.0),
            CompactNode::Visible(i) => Position::new(layout.visible_x(), layout.stack_y(i, num_visible)),
            CompactNode::Hidden(j) => Position::new(layout.hidden_x(), layout.stack_y(j, num_hidden)),
        })
        .collect();

    tracing::debug!(
        num_visible,
        num_hidden,
        nodes = nodes.len(),
        edges = edges.len(),
        "generated compact topology"
    );

    Ok((
        CompactGraph { num_visible, num_hidden, nodes, edges, node_index, name_index, endpoint_index },
        positions,
    ))
}

impl CompactGraph {
    pub fn num_visible(&self) -> usize {
        self.num_visible
    }

    pub fn num_hidden(&self) -> usize {
        self.num_hidden
    }

    pub fn layer_size(&self, layer: Layer) -> usize {
        match layer {
            Layer::Visible => self.num_visible,
            Layer::Hidden => self.num_hidden,
        }
    }

    pub fn nodes(&self) -> &[CompactNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CompactEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: CompactEdgeId) -> Option<&CompactEdge> {
        self.edges.get(id.0)
    }

    pub fn node_id(&self, node: CompactNode) -> Option<CompactNodeId> {
        self.node_index.get(&node).copied()
    }

    /// Exact-match lookup by edge name (`BV0`, `W12`, ...).
    pub fn edge_by_name(&self, name: &str) -> Result<&CompactEdge> {
        self.name_index
            .get(name)
            .map(|id| &self.edges[id.0])
            .ok_or_else(|| Error::NotFound(format!("edge {name}")))
    }

    /// The edge joining `a` to `b`, in (bias|visible, layer|hidden) order.
    pub fn edge_between(&self, a: CompactNode, b: CompactNode) -> Option<CompactEdgeId> {
        self.endpoint_index.get(&(a, b)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_by_one() {
        let (g, pos) = generate(2, 1, &LayoutParams::default()).unwrap();

        let ids: Vec<String> = g.nodes().iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["L", "R", "V0", "V1", "H0"]);

        let names: Vec<&str> = g.edges().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["BV0", "BV1", "BH0", "W00", "W10"]);

        assert_eq!(pos[0], Position::new(0.0, 0.0));
        assert_eq!(pos[1], Position::new(8.0, 0.0));
        assert_eq!(pos[2], Position::new(2.0, 1.0));
        assert_eq!(pos[3], Position::new(2.0, -1.0));
        assert_eq!(pos[4], Position::new(6.0, -0.0));
    }

    #[test]
    fn test_lookup_by_name() {
        let (g, _) = generate(3, 2, &LayoutParams::default()).unwrap();
        let e = g.edge_by_name("W21").unwrap();
        assert_eq!(e.endpoints(), (CompactNode::Visible(2), CompactNode::Hidden(1)));
        assert!(matches!(g.edge_by_name("W33"), Err(Error::NotFound(_))));
        assert_eq!(
            g.edge_between(CompactNode::Bias(Rail::Right), CompactNode::Hidden(1)),
            Some(CompactEdgeId(4))
        );
    }

    #[test]
    fn test_empty_layers() {
        let (g, pos) = generate(0, 0, &LayoutParams::default()).unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(pos.len(), 2);
    }

    #[test]
    fn test_ambiguous_names_fail_at_generation() {
        // V1-H11 and V11-H1 both name to W111.
        let result = generate(12, 12, &LayoutParams::default());
        assert!(matches!(result, Err(Error::DuplicateName(_))));

        // Ten visible, one hidden: still unambiguous.
        assert!(generate(10, 1, &LayoutParams::default()).is_ok());
    }
}
