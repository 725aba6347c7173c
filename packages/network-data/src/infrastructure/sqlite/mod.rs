//! SQLite-backed network-data store.
//!
//! Owns the two-table relational schema (`nodes`, `edges`) and the
//! insertion/query interface the converters target. Every operation
//! acquires the shared connection for its own scope only; the guard is
//! released on all exit paths before the call returns.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use rusqlite::{params, params_from_iter, Connection};
use tracing::debug;

use crate::defaults::{
    TableKind, ID_COLUMN_NAME, LABEL_COLUMN_NAME, SOURCE_COLUMN_NAME, TARGET_COLUMN_NAME,
};
use crate::domain::schema::AttributeSchema;
use crate::domain::table::ColumnTable;
use crate::domain::value::AttrValue;
use crate::error::{NetworkDataError, Result};

const RESERVED_COLUMNS: [&str; 4] = [
    ID_COLUMN_NAME,
    LABEL_COLUMN_NAME,
    SOURCE_COLUMN_NAME,
    TARGET_COLUMN_NAME,
];

/// Relational store for one network dataset.
#[derive(Clone)]
pub struct NetworkDataStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for NetworkDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkDataStore").finish_non_exhaustive()
    }
}

impl NetworkDataStore {
    /// Create a store at the given path, laying out the node and edge
    /// tables from the attribute schemas.
    pub fn create(
        path: impl AsRef<Path>,
        node_schema: &AttributeSchema,
        edge_schema: &AttributeSchema,
    ) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, node_schema, edge_schema)
    }

    /// Create an in-memory store (tests, scratch conversions).
    pub fn create_in_memory(
        node_schema: &AttributeSchema,
        edge_schema: &AttributeSchema,
    ) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, node_schema, edge_schema)
    }

    /// Open an existing store without touching its schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_connection(
        conn: Connection,
        node_schema: &AttributeSchema,
        edge_schema: &AttributeSchema,
    ) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema(node_schema, edge_schema)?;
        Ok(store)
    }

    fn init_schema(
        &self,
        node_schema: &AttributeSchema,
        edge_schema: &AttributeSchema,
    ) -> Result<()> {
        check_reserved(TableKind::Nodes, node_schema)?;
        check_reserved(TableKind::Edges, edge_schema)?;

        let conn = self.conn.lock().unwrap();

        let mut node_columns = vec![
            format!("{} TEXT PRIMARY KEY", quote_ident(ID_COLUMN_NAME)),
            format!("{} TEXT", quote_ident(LABEL_COLUMN_NAME)),
        ];
        for (name, ty) in node_schema.iter() {
            node_columns.push(format!("{} {}", quote_ident(name), ty.as_str()));
        }
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS nodes ({})",
                node_columns.join(", ")
            ),
            [],
        )?;

        let mut edge_columns = vec![
            format!("{} TEXT NOT NULL", quote_ident(SOURCE_COLUMN_NAME)),
            format!("{} TEXT NOT NULL", quote_ident(TARGET_COLUMN_NAME)),
        ];
        for (name, ty) in edge_schema.iter() {
            edge_columns.push(format!("{} {}", quote_ident(name), ty.as_str()));
        }
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS edges ({})",
                edge_columns.join(", ")
            ),
            [],
        )?;

        debug!(
            node_attrs = node_schema.len(),
            edge_attrs = edge_schema.len(),
            "initialized network-data schema"
        );
        Ok(())
    }

    /// Insert node rows in one transaction.
    ///
    /// A row with an id but no label gets the id as its label.
    pub fn insert_nodes(&self, records: &[IndexMap<String, AttrValue>]) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;
        for record in records {
            let mut record = record.clone();
            if let Some(id) = record.get(ID_COLUMN_NAME).cloned() {
                record.entry(LABEL_COLUMN_NAME.to_string()).or_insert(id);
            }
            tx.execute(
                &insert_sql(TableKind::Nodes, &record),
                params_from_iter(record.values()),
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert edge rows in one transaction, auto-registering endpoint
    /// identifiers not present in `existing_node_ids`.
    ///
    /// Returns the identifiers registered by this call so the caller can
    /// thread them into later batches.
    pub fn insert_edges(
        &self,
        records: &[IndexMap<String, AttrValue>],
        existing_node_ids: &HashSet<String>,
    ) -> Result<HashSet<String>> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;
        let mut newly_seen = HashSet::new();
        for record in records {
            for endpoint in [SOURCE_COLUMN_NAME, TARGET_COLUMN_NAME] {
                let id = record
                    .get(endpoint)
                    .ok_or_else(|| {
                        NetworkDataError::schema_conflict(format!(
                            "edges table has no {endpoint} column"
                        ))
                    })?
                    .to_id_string()
                    .ok_or_else(|| {
                        NetworkDataError::schema_conflict(format!(
                            "edges table has a null {endpoint}"
                        ))
                    })?;
                if !existing_node_ids.contains(&id) && !newly_seen.contains(&id) {
                    tx.execute(
                        "INSERT OR IGNORE INTO nodes (id, label) VALUES (?1, ?1)",
                        params![id],
                    )?;
                    newly_seen.insert(id);
                }
            }
            tx.execute(
                &insert_sql(TableKind::Edges, record),
                params_from_iter(record.values()),
            )?;
        }
        tx.commit()?;
        Ok(newly_seen)
    }

    /// Row count of one table.
    pub fn count_rows(&self, kind: TableKind) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            &format!("SELECT count(*) FROM {}", kind.as_str()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Column names of one table, in schema order.
    pub fn table_columns(&self, kind: TableKind) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", kind.as_str()))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Materialize up to `limit` rows starting at `offset`, in table
    /// scan order.
    pub fn select_slice(&self, kind: TableKind, offset: usize, limit: usize) -> Result<ColumnTable> {
        let conn = self.conn.lock().unwrap();
        let mut query = format!("SELECT * FROM {} LIMIT {}", kind.as_str(), limit);
        if offset > 0 {
            query.push_str(&format!(" OFFSET {offset}"));
        }
        let mut stmt = conn.prepare(&query)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut columns: IndexMap<String, Vec<AttrValue>> = names
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            for index in 0..names.len() {
                let value: AttrValue = row.get(index)?;
                if let Some((_, column)) = columns.get_index_mut(index) {
                    column.push(value);
                }
            }
        }
        ColumnTable::from_columns(columns)
    }
}

fn check_reserved(kind: TableKind, schema: &AttributeSchema) -> Result<()> {
    for name in schema.column_names() {
        if RESERVED_COLUMNS.contains(&name) {
            return Err(NetworkDataError::schema_conflict(format!(
                "{kind} attribute {name:?} collides with a reserved column"
            )));
        }
    }
    Ok(())
}

fn insert_sql(kind: TableKind, record: &IndexMap<String, AttrValue>) -> String {
    let columns: Vec<String> = record.keys().map(|name| quote_ident(name)).collect();
    let placeholders: Vec<String> = (1..=record.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        kind.as_str(),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Quote a dynamic identifier for SQLite.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::SqliteType;

    fn schemas() -> (AttributeSchema, AttributeSchema) {
        let mut node_schema = AttributeSchema::new();
        node_schema.insert("color", SqliteType::Text);
        let mut edge_schema = AttributeSchema::new();
        edge_schema.insert("weight", SqliteType::Real);
        (node_schema, edge_schema)
    }

    fn node_row(id: &str, color: AttrValue) -> IndexMap<String, AttrValue> {
        IndexMap::from([
            (ID_COLUMN_NAME.to_string(), AttrValue::text(id)),
            ("color".to_string(), color),
        ])
    }

    fn edge_row(source: &str, target: &str, weight: AttrValue) -> IndexMap<String, AttrValue> {
        IndexMap::from([
            (SOURCE_COLUMN_NAME.to_string(), AttrValue::text(source)),
            (TARGET_COLUMN_NAME.to_string(), AttrValue::text(target)),
            ("weight".to_string(), weight),
        ])
    }

    #[test]
    fn test_create_and_columns() {
        let (node_schema, edge_schema) = schemas();
        let store = NetworkDataStore::create_in_memory(&node_schema, &edge_schema).unwrap();

        assert_eq!(
            store.table_columns(TableKind::Nodes).unwrap(),
            vec!["id", "label", "color"]
        );
        assert_eq!(
            store.table_columns(TableKind::Edges).unwrap(),
            vec!["source", "target", "weight"]
        );
    }

    #[test]
    fn test_reserved_schema_attribute_rejected() {
        let mut node_schema = AttributeSchema::new();
        node_schema.insert("label", SqliteType::Text);
        let err =
            NetworkDataStore::create_in_memory(&node_schema, &AttributeSchema::new()).unwrap_err();
        assert!(matches!(err, NetworkDataError::SchemaConflict(_)));
    }

    #[test]
    fn test_insert_nodes_defaults_label_to_id() {
        let (node_schema, edge_schema) = schemas();
        let store = NetworkDataStore::create_in_memory(&node_schema, &edge_schema).unwrap();
        store
            .insert_nodes(&[node_row("a", AttrValue::text("red"))])
            .unwrap();

        let table = store.select_slice(TableKind::Nodes, 0, 10).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.column("label").unwrap()[0], AttrValue::text("a"));
        assert_eq!(table.column("color").unwrap()[0], AttrValue::text("red"));
    }

    #[test]
    fn test_insert_edges_auto_registers_endpoints() {
        let (node_schema, edge_schema) = schemas();
        let store = NetworkDataStore::create_in_memory(&node_schema, &edge_schema).unwrap();

        let mut existing = HashSet::new();
        existing.insert("a".to_string());

        let newly = store
            .insert_edges(
                &[
                    edge_row("a", "b", AttrValue::real(1.0)),
                    edge_row("b", "c", AttrValue::nan()),
                ],
                &existing,
            )
            .unwrap();

        assert_eq!(
            newly,
            HashSet::from(["b".to_string(), "c".to_string()])
        );
        assert_eq!(store.count_rows(TableKind::Edges).unwrap(), 2);
        // a was claimed as existing, so only b and c were registered
        assert_eq!(store.count_rows(TableKind::Nodes).unwrap(), 2);

        let nodes = store.select_slice(TableKind::Nodes, 0, 10).unwrap();
        let labels = nodes.column("label").unwrap();
        assert_eq!(labels, &[AttrValue::text("b"), AttrValue::text("c")]);
    }

    #[test]
    fn test_nan_padding_stored_as_null() {
        let (node_schema, edge_schema) = schemas();
        let store = NetworkDataStore::create_in_memory(&node_schema, &edge_schema).unwrap();
        store
            .insert_edges(&[edge_row("a", "b", AttrValue::nan())], &HashSet::new())
            .unwrap();

        let edges = store.select_slice(TableKind::Edges, 0, 10).unwrap();
        assert_eq!(edges.column("weight").unwrap()[0], AttrValue::Null);
    }

    #[test]
    fn test_missing_endpoint_column_rejected() {
        let (node_schema, edge_schema) = schemas();
        let store = NetworkDataStore::create_in_memory(&node_schema, &edge_schema).unwrap();

        let record = IndexMap::from([(
            SOURCE_COLUMN_NAME.to_string(),
            AttrValue::text("a"),
        )]);
        let err = store.insert_edges(&[record], &HashSet::new()).unwrap_err();
        assert!(matches!(err, NetworkDataError::SchemaConflict(_)));
        // the failed batch inserted nothing
        assert_eq!(store.count_rows(TableKind::Edges).unwrap(), 0);
        assert_eq!(store.count_rows(TableKind::Nodes).unwrap(), 0);
    }

    #[test]
    fn test_select_slice_offset() {
        let (node_schema, edge_schema) = schemas();
        let store = NetworkDataStore::create_in_memory(&node_schema, &edge_schema).unwrap();
        store
            .insert_nodes(&[
                node_row("a", AttrValue::text("red")),
                node_row("b", AttrValue::text("green")),
                node_row("c", AttrValue::text("blue")),
            ])
            .unwrap();

        let tail = store.select_slice(TableKind::Nodes, 1, 10).unwrap();
        assert_eq!(tail.len(), 2);

        let window = store.select_slice(TableKind::Nodes, 1, 1).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window.column("id").unwrap()[0], AttrValue::text("b"));
    }
}
