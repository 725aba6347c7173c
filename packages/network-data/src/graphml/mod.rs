//! GraphML document parsing.
//!
//! Reads a GraphML XML file into a [`NetworkGraph`] plus the node and
//! edge attribute schemas declared by its `<key>` elements. Parsing is
//! all-or-nothing: malformed XML or an incomplete document structure
//! fails without returning a partial graph.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node as XmlNode};
use tracing::debug;

use crate::domain::graph::NetworkGraph;
use crate::domain::schema::{AttributeSchema, AttributeType};
use crate::domain::value::AttrValue;
use crate::error::{NetworkDataError, Result};

/// A parsed GraphML document: the graph itself plus the attribute
/// schemas, each ordered by ascending declaration key id.
#[derive(Debug, Clone)]
pub struct GraphmlDocument {
    pub graph: NetworkGraph,
    pub node_schema: AttributeSchema,
    pub edge_schema: AttributeSchema,
}

/// One `<key>` declaration. Held only while scanning; the schemas are
/// what survives parsing.
struct KeyDeclaration {
    name: String,
    attr_type: AttributeType,
}

/// Parse a GraphML file into a graph and its attribute schemas.
pub fn parse_graphml_file(path: impl AsRef<Path>) -> Result<GraphmlDocument> {
    let text = fs::read_to_string(path)?;
    parse_graphml_str(&text)
}

/// Parse GraphML document text. See [`parse_graphml_file`].
pub fn parse_graphml_str(text: &str) -> Result<GraphmlDocument> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if !root.has_tag_name("graphml") {
        return Err(NetworkDataError::parse("missing <graphml> root element"));
    }
    let graph_el = root
        .descendants()
        .find(|n| n.is_element() && n.has_tag_name("graph"))
        .ok_or_else(|| NetworkDataError::parse("missing <graph> element"))?;
    let name = graph_el.attribute("id").unwrap_or("");

    // <key> scan: one id → declaration map per target. A key declared
    // for="edge" is edge-scoped; for="node" and any other or missing
    // value is node-scoped (GraphML convention).
    let mut node_keys: HashMap<String, KeyDeclaration> = HashMap::new();
    let mut edge_keys: HashMap<String, KeyDeclaration> = HashMap::new();
    for key in root
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("key"))
    {
        let key_id = key
            .attribute("id")
            .ok_or_else(|| NetworkDataError::parse("<key> element without an id"))?;
        let attr_type = AttributeType::from_graphml(key.attribute("attr.type").unwrap_or(""))?;
        let decl = KeyDeclaration {
            // a key with no attr.name is addressed by its id
            name: key.attribute("attr.name").unwrap_or(key_id).to_string(),
            attr_type,
        };
        if key.attribute("for") == Some("edge") {
            edge_keys.insert(key_id.to_string(), decl);
        } else {
            node_keys.insert(key_id.to_string(), decl);
        }
    }

    let node_schema = build_schema(&node_keys);
    let edge_schema = build_schema(&edge_keys);

    let mut graph = NetworkGraph::new(name);

    for node in graph_el
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("node"))
    {
        let node_id = node
            .attribute("id")
            .ok_or_else(|| NetworkDataError::parse("<node> element without an id"))?;
        let idx = graph.add_node(node_id);
        for (attr_name, value) in data_attributes(node, &node_keys)? {
            graph.set_node_attr(idx, attr_name, value);
        }
    }

    for edge in graph_el
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("edge"))
    {
        // source/target refer to node ids, not labels
        let source = edge
            .attribute("source")
            .ok_or_else(|| NetworkDataError::parse("<edge> element without a source"))?;
        let target = edge
            .attribute("target")
            .ok_or_else(|| NetworkDataError::parse("<edge> element without a target"))?;
        let idx = graph.add_edge_by_id(source, target);
        for (attr_name, value) in data_attributes(edge, &edge_keys)? {
            graph.set_edge_attr(idx, attr_name, value);
        }
    }

    debug!(
        name = graph.name(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "parsed graphml document"
    );

    Ok(GraphmlDocument {
        graph,
        node_schema,
        edge_schema,
    })
}

/// Schema in ascending key-id order, independent of document order.
fn build_schema(keys: &HashMap<String, KeyDeclaration>) -> AttributeSchema {
    let mut ids: Vec<&String> = keys.keys().collect();
    ids.sort();
    let mut schema = AttributeSchema::new();
    for id in ids {
        let decl = &keys[id];
        schema.insert(decl.name.clone(), decl.attr_type.sqlite_type());
    }
    schema
}

/// Resolve the `<data>` children of a node or edge element against the
/// key declarations for its target.
fn data_attributes(
    parent: XmlNode<'_, '_>,
    keys: &HashMap<String, KeyDeclaration>,
) -> Result<Vec<(String, AttrValue)>> {
    let mut attrs = Vec::new();
    for data in parent
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("data"))
    {
        let key_id = data
            .attribute("key")
            .ok_or_else(|| NetworkDataError::parse("<data> element without a key"))?;
        let decl = keys.get(key_id).ok_or_else(|| {
            NetworkDataError::parse(format!("<data> references undeclared key {key_id:?}"))
        })?;
        let value = match data.text() {
            // no text content still records the attribute, as empty text
            None => AttrValue::Text(String::new()),
            Some(text) => parse_attr_value(&decl.name, decl.attr_type, text)?,
        };
        attrs.push((decl.name.clone(), value));
    }
    Ok(attrs)
}

/// Parse a `<data>` value under its declared attribute type.
fn parse_attr_value(name: &str, ty: AttributeType, text: &str) -> Result<AttrValue> {
    let value = match ty {
        AttributeType::Boolean => match text.trim() {
            "true" | "1" => AttrValue::Integer(1),
            "false" | "0" => AttrValue::Integer(0),
            other => {
                return Err(NetworkDataError::parse(format!(
                    "attribute {name:?}: invalid boolean value {other:?}"
                )))
            }
        },
        AttributeType::Int | AttributeType::Long => {
            let parsed = text.trim().parse::<i64>().map_err(|_| {
                NetworkDataError::parse(format!(
                    "attribute {name:?}: invalid integer value {text:?}"
                ))
            })?;
            AttrValue::Integer(parsed)
        }
        AttributeType::Float | AttributeType::Double => {
            let parsed = text.trim().parse::<f64>().map_err(|_| {
                NetworkDataError::parse(format!(
                    "attribute {name:?}: invalid floating-point value {text:?}"
                ))
            })?;
            AttrValue::Real(parsed)
        }
        AttributeType::String => AttrValue::Text(text.to_string()),
    };
    Ok(value)
}
