//! In-memory network graph built on petgraph.

use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::domain::value::AttrValue;

/// A node with its identifier and open attribute record.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub attributes: IndexMap<String, AttrValue>,
}

/// Edge attributes; the endpoints live in the graph structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeRecord {
    pub attributes: IndexMap<String, AttrValue>,
}

/// A named directed graph with attributed nodes and edges.
///
/// Created by the GraphML parser or supplied directly by a caller, and
/// consumed by the table extractor; never persisted in this form.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    name: String,
    graph: DiGraph<NodeRecord, EdgeRecord>,
    id_to_node: HashMap<String, NodeIndex>,
}

impl NetworkGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: DiGraph::new(),
            id_to_node: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a node by identifier, returning the existing index if the
    /// identifier is already present.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(idx) = self.id_to_node.get(&id) {
            return *idx;
        }
        let idx = self.graph.add_node(NodeRecord {
            id: id.clone(),
            attributes: IndexMap::new(),
        });
        self.id_to_node.insert(id, idx);
        idx
    }

    /// Add an edge between two node identifiers, creating endpoints that
    /// are not present yet.
    pub fn add_edge_by_id(&mut self, source: &str, target: &str) -> EdgeIndex {
        let source = self.add_node(source);
        let target = self.add_node(target);
        self.graph.add_edge(source, target, EdgeRecord::default())
    }

    pub fn set_node_attr(&mut self, node: NodeIndex, name: impl Into<String>, value: AttrValue) {
        self.graph[node].attributes.insert(name.into(), value);
    }

    pub fn set_edge_attr(&mut self, edge: EdgeIndex, name: impl Into<String>, value: AttrValue) {
        self.graph[edge].attributes.insert(name.into(), value);
    }

    pub fn node_by_id(&self, id: &str) -> Option<&NodeRecord> {
        self.id_to_node.get(id).map(|idx| &self.graph[*idx])
    }

    /// Nodes in insertion order with their attribute records.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.graph.node_weights()
    }

    /// Edges as (source id, target id, attributes), in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &IndexMap<String, AttrValue>)> {
        self.graph.edge_references().map(move |edge| {
            let source = &self.graph[edge.source()];
            let target = &self.graph[edge.target()];
            (
                source.id.as_str(),
                target.id.as_str(),
                &edge.weight().attributes,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_deduplicates() {
        let mut graph = NetworkGraph::new("g");
        let a = graph.add_node("a");
        let again = graph.add_node("a");
        assert_eq!(a, again);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge_creates_missing_endpoints() {
        let mut graph = NetworkGraph::new("g");
        graph.add_node("a");
        graph.add_edge_by_id("a", "b");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges[0].0, "a");
        assert_eq!(edges[0].1, "b");
    }

    #[test]
    fn test_attributes() {
        let mut graph = NetworkGraph::new("g");
        let a = graph.add_node("a");
        graph.set_node_attr(a, "color", AttrValue::text("red"));

        let e = graph.add_edge_by_id("a", "b");
        graph.set_edge_attr(e, "weight", AttrValue::real(0.5));

        assert_eq!(
            graph.node_by_id("a").unwrap().attributes["color"],
            AttrValue::text("red")
        );
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges[0].2["weight"], AttrValue::real(0.5));
    }
}
