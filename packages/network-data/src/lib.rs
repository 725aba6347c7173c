//! Conversion between graph representations and relational network data.
//!
//! This crate is format-conversion glue between three static data shapes:
//! GraphML XML documents, column-oriented node/edge tables, and a
//! two-table (`nodes`, `edges`) SQLite schema.
//!
//! - [`graphml`]: parse a GraphML file into a [`NetworkGraph`] plus node
//!   and edge attribute schemas.
//! - [`convert`]: extract node/edge tables from a graph, and insert
//!   externally-shaped tables into the store under the fixed schema.
//! - [`infrastructure::sqlite`]: the SQLite-backed [`NetworkDataStore`].
//! - [`infrastructure::tabular`]: read-only tabular views over stored
//!   tables.
//!
//! Control flow: GraphML file → parser → in-memory graph → table
//! extractor → column tables → schema-mapping inserter → relational
//! store. A table already in the target shape can skip extraction and go
//! straight to the inserter; the tabular view is a read-side accessor
//! used after data is stored.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use network_data::{
//!     extract_edges_as_table, extract_nodes_as_table, insert_table_data,
//!     parse_graphml_file, InsertOptions, NetworkDataStore,
//! };
//!
//! let doc = parse_graphml_file("friends.graphml")?;
//! let nodes = extract_nodes_as_table(&doc.graph)?;
//! let edges = extract_edges_as_table(&doc.graph)?;
//!
//! let store = NetworkDataStore::create("friends.db", &doc.node_schema, &doc.edge_schema)?;
//! insert_table_data(
//!     &store,
//!     &edges,
//!     InsertOptions { nodes: Some(&nodes), ..Default::default() },
//! )?;
//! ```

pub mod convert;
pub mod defaults;
pub mod domain;
pub mod error;
pub mod graphml;
pub mod infrastructure;

pub use convert::{
    extract_edges_as_table, extract_nodes_as_table, insert_table_data, map_batch_columns,
    InsertOptions,
};
pub use defaults::{
    TableKind, DEFAULT_CHUNK_SIZE, ID_COLUMN_NAME, LABEL_COLUMN_NAME, SOURCE_COLUMN_NAME,
    TARGET_COLUMN_NAME,
};
pub use domain::graph::{EdgeRecord, NetworkGraph, NodeRecord};
pub use domain::schema::{
    graphml_type_to_sqlite, AttributeSchema, AttributeType, ColumnMap, MappingRule, SqliteType,
};
pub use domain::table::{ColumnTable, Tabular};
pub use domain::value::AttrValue;
pub use error::{NetworkDataError, Result};
pub use graphml::{parse_graphml_file, parse_graphml_str, GraphmlDocument};
pub use infrastructure::sqlite::NetworkDataStore;
pub use infrastructure::tabular::NetworkDataTabular;
