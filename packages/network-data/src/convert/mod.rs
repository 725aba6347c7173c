//! Converters between graphs, column tables, and the relational store.

pub mod extract;
pub mod insert;

pub use extract::{extract_edges_as_table, extract_nodes_as_table};
pub use insert::{insert_table_data, map_batch_columns, InsertOptions};
