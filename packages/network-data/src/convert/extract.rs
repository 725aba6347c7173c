//! Graph → column-table extraction.
//!
//! Both extractors take the union of attribute names across all nodes or
//! edges and pad rows missing an attribute with the not-a-number
//! placeholder, so every output table is fully rectangular; downstream
//! batch insertion requires that.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::defaults::{ID_COLUMN_NAME, SOURCE_COLUMN_NAME, TARGET_COLUMN_NAME};
use crate::domain::graph::NetworkGraph;
use crate::domain::table::ColumnTable;
use crate::domain::value::AttrValue;
use crate::error::{NetworkDataError, Result};

/// Extract every edge into a table with the reserved `source`/`target`
/// columns plus one column per attribute name seen on any edge.
pub fn extract_edges_as_table(graph: &NetworkGraph) -> Result<ColumnTable> {
    let edges: Vec<_> = graph.edges().collect();

    let mut all_attrs: BTreeSet<&str> = BTreeSet::new();
    for (_, _, attrs) in &edges {
        all_attrs.extend(attrs.keys().map(String::as_str));
    }
    for reserved in [SOURCE_COLUMN_NAME, TARGET_COLUMN_NAME] {
        if all_attrs.contains(reserved) {
            return Err(NetworkDataError::schema_conflict(format!(
                "edge attribute {reserved:?} collides with a reserved edge column"
            )));
        }
    }

    let mut columns: IndexMap<String, Vec<AttrValue>> = IndexMap::new();
    columns.insert(
        SOURCE_COLUMN_NAME.to_string(),
        edges
            .iter()
            .map(|(source, _, _)| AttrValue::text(*source))
            .collect(),
    );
    columns.insert(
        TARGET_COLUMN_NAME.to_string(),
        edges
            .iter()
            .map(|(_, target, _)| AttrValue::text(*target))
            .collect(),
    );
    for attr in all_attrs {
        let values = edges
            .iter()
            .map(|(_, _, attrs)| attrs.get(attr).cloned().unwrap_or_else(AttrValue::nan))
            .collect();
        columns.insert(attr.to_string(), values);
    }

    ColumnTable::from_columns(columns)
}

/// Extract every node into a table with the reserved `id` column plus one
/// column per attribute name seen on any node.
///
/// An attribute named like the edge source column is also rejected: the
/// name would turn ambiguous when node and edge tables are merged
/// downstream.
pub fn extract_nodes_as_table(graph: &NetworkGraph) -> Result<ColumnTable> {
    let nodes: Vec<_> = graph.nodes().collect();

    let mut all_attrs: BTreeSet<&str> = BTreeSet::new();
    for node in &nodes {
        all_attrs.extend(node.attributes.keys().map(String::as_str));
    }
    for reserved in [ID_COLUMN_NAME, SOURCE_COLUMN_NAME] {
        if all_attrs.contains(reserved) {
            return Err(NetworkDataError::schema_conflict(format!(
                "node attribute {reserved:?} collides with a reserved column"
            )));
        }
    }

    let mut columns: IndexMap<String, Vec<AttrValue>> = IndexMap::new();
    columns.insert(
        ID_COLUMN_NAME.to_string(),
        nodes.iter().map(|node| AttrValue::text(&node.id)).collect(),
    );
    for attr in all_attrs {
        let values = nodes
            .iter()
            .map(|node| {
                node.attributes
                    .get(attr)
                    .cloned()
                    .unwrap_or_else(AttrValue::nan)
            })
            .collect();
        columns.insert(attr.to_string(), values);
    }

    ColumnTable::from_columns(columns)
}
