//! Schema-mapping insertion of node/edge tables into the store.
//!
//! Tables are processed in fixed-size batches to bound memory on
//! arbitrarily large inputs. The set of node identifiers already inserted
//! is threaded across batches: edges may reference nodes inserted in an
//! earlier batch, or never explicitly inserted as nodes at all.

use std::collections::HashSet;

use tracing::debug;

use crate::defaults::{TableKind, DEFAULT_CHUNK_SIZE, ID_COLUMN_NAME};
use crate::domain::schema::{ColumnMap, MappingRule};
use crate::domain::table::ColumnTable;
use crate::domain::value::AttrValue;
use crate::error::{NetworkDataError, Result};
use crate::infrastructure::sqlite::NetworkDataStore;

/// Options for [`insert_table_data`].
#[derive(Debug, Clone)]
pub struct InsertOptions<'a> {
    /// Column renames applied to each edge batch.
    pub edge_column_map: Option<&'a ColumnMap>,
    /// Nodes table. When absent, every node the edges reference is
    /// auto-registered from its endpoints.
    pub nodes: Option<&'a ColumnTable>,
    /// Column renames applied to each node batch.
    pub node_column_map: Option<&'a ColumnMap>,
    /// Rows per insertion batch.
    pub chunk_size: usize,
}

impl Default for InsertOptions<'_> {
    fn default() -> Self {
        Self {
            edge_column_map: None,
            nodes: None,
            node_column_map: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Insert an edges table (and optionally a nodes table) into the store.
///
/// Nodes are inserted first so edge insertion can recognize their
/// identifiers; endpoints not covered by the nodes table are
/// auto-registered by the store and fed back into the accumulator so
/// later batches see them too. Returns the full set of node identifiers
/// known after insertion.
///
/// Any duplicate-column-after-mapping is a hard error: the insertion
/// aborts with batches committed so far left in place.
pub fn insert_table_data(
    store: &NetworkDataStore,
    edges: &ColumnTable,
    options: InsertOptions<'_>,
) -> Result<HashSet<String>> {
    let chunk_size = options.chunk_size.max(1);
    let mut seen_node_ids: HashSet<String> = HashSet::new();

    if let Some(nodes) = options.nodes {
        for batch in nodes.batches(chunk_size) {
            let batch = match options.node_column_map {
                Some(map) => map_batch_columns(&batch, map, TableKind::Nodes)?,
                None => batch,
            };
            let ids = batch_node_ids(&batch)?;
            store.insert_nodes(&batch.to_rows())?;
            debug!(rows = batch.len(), "inserted node batch");
            seen_node_ids.extend(ids);
        }
    }

    for batch in edges.batches(chunk_size) {
        let batch = match options.edge_column_map {
            Some(map) => map_batch_columns(&batch, map, TableKind::Edges)?,
            None => batch,
        };
        let newly_seen = store.insert_edges(&batch.to_rows(), &seen_node_ids)?;
        debug!(
            rows = batch.len(),
            auto_registered = newly_seen.len(),
            "inserted edge batch"
        );
        seen_node_ids.extend(newly_seen);
    }

    Ok(seen_node_ids)
}

/// Apply a column mapping to one batch.
///
/// Each pair moves its source column to the target name, except under
/// [`MappingRule::IdentityCopy`]: on a nodes table the reserved id column
/// is copied to the label column and kept in place. A rename landing on a
/// column that still exists after the move is a hard error.
pub fn map_batch_columns(
    batch: &ColumnTable,
    map: &ColumnMap,
    kind: TableKind,
) -> Result<ColumnTable> {
    let mut mapped = batch.clone();
    for (source, target) in map.iter() {
        match MappingRule::for_pair(kind, source, target) {
            MappingRule::IdentityCopy => {
                if let Some(values) = mapped.column(source).map(<[AttrValue]>::to_vec) {
                    mapped.insert_column(target, values);
                }
            }
            MappingRule::Rename => {
                if let Some(values) = mapped.remove_column(source) {
                    if mapped.contains_column(target) {
                        return Err(NetworkDataError::schema_conflict(format!(
                            "duplicate {kind} column name after mapping: {target:?}"
                        )));
                    }
                    mapped.insert_column(target, values);
                }
            }
        }
    }
    Ok(mapped)
}

fn batch_node_ids(batch: &ColumnTable) -> Result<Vec<String>> {
    let ids = batch
        .column(ID_COLUMN_NAME)
        .ok_or_else(|| NetworkDataError::schema_conflict("nodes table has no id column"))?;
    ids.iter()
        .map(|value| {
            value
                .to_id_string()
                .ok_or_else(|| NetworkDataError::schema_conflict("nodes table has a null id"))
        })
        .collect()
}
