//! Domain models: attribute values, schemas, column tables, and the
//! in-memory graph.

pub mod graph;
pub mod schema;
pub mod table;
pub mod value;

pub use graph::{EdgeRecord, NetworkGraph, NodeRecord};
pub use schema::{AttributeSchema, AttributeType, ColumnMap, MappingRule, SqliteType};
pub use table::{ColumnTable, Tabular};
pub use value::AttrValue;
