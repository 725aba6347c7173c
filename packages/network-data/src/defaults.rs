//! Reserved column names and conversion defaults.
//!
//! The relational network-data schema owns four reserved columns. Every
//! converter in this crate refers to them through these constants rather
//! than string literals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved node identifier column.
pub const ID_COLUMN_NAME: &str = "id";

/// Reserved node label column.
pub const LABEL_COLUMN_NAME: &str = "label";

/// Reserved edge source column.
pub const SOURCE_COLUMN_NAME: &str = "source";

/// Reserved edge target column.
pub const TARGET_COLUMN_NAME: &str = "target";

/// Default number of rows per insertion batch.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// The two tables of the network-data schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Nodes,
    Edges,
}

impl TableKind {
    /// Table name in the relational store.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Nodes => "nodes",
            TableKind::Edges => "edges",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
