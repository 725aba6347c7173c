//! GraphML attribute typing and column mappings.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::defaults::{TableKind, ID_COLUMN_NAME, LABEL_COLUMN_NAME};
use crate::error::{NetworkDataError, Result};

/// The six attribute types a GraphML `<key>` declaration may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl AttributeType {
    /// Parse a GraphML `attr.type` value. Anything outside the recognized
    /// set signals a malformed or unsupported type declaration.
    pub fn from_graphml(name: &str) -> Result<Self> {
        match name {
            "boolean" => Ok(AttributeType::Boolean),
            "int" => Ok(AttributeType::Int),
            "long" => Ok(AttributeType::Long),
            "float" => Ok(AttributeType::Float),
            "double" => Ok(AttributeType::Double),
            "string" => Ok(AttributeType::String),
            other => Err(NetworkDataError::UnsupportedAttributeType(
                other.to_string(),
            )),
        }
    }

    /// The SQLite column type this attribute maps to.
    pub fn sqlite_type(&self) -> SqliteType {
        match self {
            AttributeType::Boolean | AttributeType::Int | AttributeType::Long => {
                SqliteType::Integer
            }
            AttributeType::Float | AttributeType::Double => SqliteType::Real,
            AttributeType::String => SqliteType::Text,
        }
    }
}

/// SQLite storage classes used by the network-data schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqliteType {
    Integer,
    Real,
    Text,
}

impl SqliteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqliteType::Integer => "INTEGER",
            SqliteType::Real => "REAL",
            SqliteType::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqliteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a GraphML attribute type name onto its SQLite column type name.
pub fn graphml_type_to_sqlite(data_type: &str) -> Result<SqliteType> {
    Ok(AttributeType::from_graphml(data_type)?.sqlite_type())
}

/// Attribute-name → column-type schema for one of the two tables,
/// ordered by ascending GraphML declaration key id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    columns: IndexMap<String, SqliteType>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Re-inserting a name keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, ty: SqliteType) {
        self.columns.insert(name.into(), ty);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, name: &str) -> Option<SqliteType> {
        self.columns.get(name).copied()
    }

    /// Columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SqliteType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// How one column-mapping pair is applied to a batch.
///
/// The identity-copy exception is a named rule on purpose: mapping the
/// reserved identifier column onto the label column must copy, not move,
/// so node identifiers double as default labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingRule {
    /// Move the source column to the target name.
    Rename,
    /// Copy the reserved identifier column to the label column, keeping
    /// the identifier column in place.
    IdentityCopy,
}

impl MappingRule {
    /// Rule for one (source, target) pair on a table of the given kind.
    pub fn for_pair(kind: TableKind, source: &str, target: &str) -> MappingRule {
        match kind {
            TableKind::Nodes if source == ID_COLUMN_NAME && target == LABEL_COLUMN_NAME => {
                MappingRule::IdentityCopy
            }
            _ => MappingRule::Rename,
        }
    }
}

/// Ordered source-column → target-column renames applied to an
/// externally-shaped table before insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    map: IndexMap<String, String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.map.insert(source.into(), target.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.insert(source, target);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for (source, target) in iter {
            map.insert(source, target);
        }
        map
    }
}
