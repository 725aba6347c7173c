//! End-to-end conversion: GraphML file → graph → column tables →
//! relational store → tabular view.

use std::collections::HashSet;
use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use network_data::{
    extract_edges_as_table, extract_nodes_as_table, insert_table_data, parse_graphml_file,
    AttrValue, ColumnMap, ColumnTable, InsertOptions, NetworkDataStore, NetworkDataTabular,
    TableKind, Tabular,
};

const GRAPHML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="d0" for="node" attr.name="color" attr.type="string"/>
  <key id="d1" for="edge" attr.name="weight" attr.type="double"/>
  <graph id="G" edgedefault="directed">
    <node id="a"><data key="d0">red</data></node>
    <node id="b"/>
    <node id="c"><data key="d0">blue</data></node>
    <edge source="a" target="b"><data key="d1">1.5</data></edge>
    <edge source="b" target="c"/>
  </graph>
</graphml>
"#;

fn write_graphml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write graphml");
    file
}

#[test]
fn graphml_to_store_and_back() {
    let file = write_graphml(GRAPHML);
    let doc = parse_graphml_file(file.path()).unwrap();
    assert_eq!(doc.graph.name(), "G");
    assert_eq!(doc.graph.node_count(), 3);
    assert_eq!(doc.graph.edge_count(), 2);

    let nodes = extract_nodes_as_table(&doc.graph).unwrap();
    let edges = extract_edges_as_table(&doc.graph).unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(edges.len(), 2);

    let store = NetworkDataStore::create_in_memory(&doc.node_schema, &doc.edge_schema).unwrap();
    let node_map = ColumnMap::new().with("id", "label");
    let seen = insert_table_data(
        &store,
        &edges,
        InsertOptions {
            nodes: Some(&nodes),
            node_column_map: Some(&node_map),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        seen,
        HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
    );

    let node_view = NetworkDataTabular::new(store.clone(), TableKind::Nodes);
    let edge_view = NetworkDataTabular::new(store, TableKind::Edges);

    // same row counts as the source graph
    assert_eq!(node_view.num_rows().unwrap(), 3);
    assert_eq!(edge_view.num_rows().unwrap(), 2);

    // stored columns are a superset of the extracted attribute columns
    let node_columns: HashSet<String> = node_view.column_names().unwrap().into_iter().collect();
    for name in nodes.column_names().unwrap() {
        assert!(node_columns.contains(&name), "missing column {name}");
    }

    let stored_nodes = node_view.to_table().unwrap();
    // the id → label mapping copied identifiers, so labels equal ids
    assert_eq!(
        stored_nodes.column("label").unwrap(),
        stored_nodes.column("id").unwrap()
    );
    assert_eq!(
        stored_nodes.column("color").unwrap()[0],
        AttrValue::text("red")
    );
    // node b had no color: NaN padding comes back as NULL
    assert_eq!(stored_nodes.column("color").unwrap()[1], AttrValue::Null);

    let stored_edges = edge_view.to_table().unwrap();
    assert_eq!(
        stored_edges.column("weight").unwrap(),
        &[AttrValue::real(1.5), AttrValue::Null]
    );
}

#[test]
fn edges_only_insertion_registers_endpoints() {
    let store = NetworkDataStore::create_in_memory(
        &network_data::AttributeSchema::new(),
        &network_data::AttributeSchema::new(),
    )
    .unwrap();

    let edges = ColumnTable::try_from_iter([
        (
            "source",
            vec![AttrValue::text("a"), AttrValue::text("b"), AttrValue::text("a")],
        ),
        (
            "target",
            vec![AttrValue::text("b"), AttrValue::text("c"), AttrValue::text("c")],
        ),
    ])
    .unwrap();

    // chunk size 1 forces the seen-set to be threaded across batches
    let seen = insert_table_data(
        &store,
        &edges,
        InsertOptions {
            chunk_size: 1,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(
        seen,
        HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
    );
    // each endpoint was auto-registered exactly once
    assert_eq!(store.count_rows(TableKind::Nodes).unwrap(), 3);
    assert_eq!(store.count_rows(TableKind::Edges).unwrap(), 3);

    let nodes = NetworkDataTabular::new(store, TableKind::Nodes)
        .to_table()
        .unwrap();
    assert_eq!(nodes.column("label").unwrap(), nodes.column("id").unwrap());
}

#[test]
fn duplicate_mapping_aborts_batch() {
    let store = NetworkDataStore::create_in_memory(
        &network_data::AttributeSchema::new(),
        &network_data::AttributeSchema::new(),
    )
    .unwrap();

    let edges = ColumnTable::try_from_iter([
        ("source", vec![AttrValue::text("a")]),
        ("target", vec![AttrValue::text("b")]),
    ])
    .unwrap();
    let nodes = ColumnTable::try_from_iter([
        ("id", vec![AttrValue::text("a")]),
        ("name", vec![AttrValue::text("Alice")]),
        ("alias", vec![AttrValue::text("Al")]),
    ])
    .unwrap();
    // both source columns collapse onto the same target
    let node_map = ColumnMap::new().with("name", "tag").with("alias", "tag");

    let err = insert_table_data(
        &store,
        &edges,
        InsertOptions {
            nodes: Some(&nodes),
            node_column_map: Some(&node_map),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, network_data::NetworkDataError::SchemaConflict(_)));

    // nothing from the failed batch reached the store
    assert_eq!(store.count_rows(TableKind::Nodes).unwrap(), 0);
    assert_eq!(store.count_rows(TableKind::Edges).unwrap(), 0);
}

#[test]
fn file_backed_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("network.db");

    let file = write_graphml(GRAPHML);
    let doc = parse_graphml_file(file.path()).unwrap();

    {
        let store =
            NetworkDataStore::create(&db_path, &doc.node_schema, &doc.edge_schema).unwrap();
        let nodes = extract_nodes_as_table(&doc.graph).unwrap();
        let edges = extract_edges_as_table(&doc.graph).unwrap();
        insert_table_data(
            &store,
            &edges,
            InsertOptions {
                nodes: Some(&nodes),
                ..Default::default()
            },
        )
        .unwrap();
    }

    // reopen without schema creation and read through the adapter
    let reopened = NetworkDataStore::open(&db_path).unwrap();
    let view = NetworkDataTabular::new(reopened, TableKind::Nodes);
    assert_eq!(view.num_rows().unwrap(), 3);
    let columns = view.column_names().unwrap();
    assert!(columns.contains(&"color".to_string()));
}
