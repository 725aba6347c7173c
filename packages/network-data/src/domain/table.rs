//! Column-oriented tables and the generic tabular interface.

use indexmap::IndexMap;

use crate::domain::value::AttrValue;
use crate::error::{NetworkDataError, Result};

/// Read-only tabular interface over row-column data.
///
/// Implemented by the in-memory [`ColumnTable`] and by the store-backed
/// [`NetworkDataTabular`](crate::infrastructure::tabular::NetworkDataTabular)
/// adapter, so callers can treat a materialized batch and a stored table
/// uniformly.
pub trait Tabular {
    fn num_rows(&self) -> Result<usize>;

    fn column_names(&self) -> Result<Vec<String>>;

    /// Materialize `length` rows starting at `offset`. `None` means the
    /// rest of the table from `offset`.
    fn slice(&self, offset: usize, length: Option<usize>) -> Result<ColumnTable>;

    /// Materialize the whole table.
    fn to_table(&self) -> Result<ColumnTable> {
        self.slice(0, None)
    }
}

/// A rectangular, insertion-ordered batch of rows.
///
/// Rectangularity (all columns equal length) is a construction invariant;
/// downstream batch insertion depends on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTable {
    columns: IndexMap<String, Vec<AttrValue>>,
}

impl ColumnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns; all columns must have the same
    /// length.
    pub fn from_columns(columns: IndexMap<String, Vec<AttrValue>>) -> Result<Self> {
        if let Some(len) = columns.values().map(Vec::len).next() {
            for (name, col) in &columns {
                if col.len() != len {
                    return Err(NetworkDataError::schema_conflict(format!(
                        "column {name:?} has {} rows, expected {len}",
                        col.len()
                    )));
                }
            }
        }
        Ok(Self { columns })
    }

    /// Convenience constructor from (name, values) pairs.
    pub fn try_from_iter<S, I>(columns: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<AttrValue>)>,
    {
        Self::from_columns(
            columns
                .into_iter()
                .map(|(name, values)| (name.into(), values))
                .collect(),
        )
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(|(_, col)| col.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[AttrValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> &IndexMap<String, Vec<AttrValue>> {
        &self.columns
    }

    pub(crate) fn insert_column(&mut self, name: impl Into<String>, values: Vec<AttrValue>) {
        self.columns.insert(name.into(), values);
    }

    pub(crate) fn remove_column(&mut self, name: &str) -> Option<Vec<AttrValue>> {
        self.columns.shift_remove(name)
    }

    /// Fixed-size row batches, in order. The last batch may be shorter.
    pub fn batches(&self, chunk_size: usize) -> impl Iterator<Item = ColumnTable> + '_ {
        let chunk = chunk_size.max(1);
        let rows = self.len();
        let count = rows.div_ceil(chunk);
        (0..count).map(move |i| self.row_range(i * chunk, chunk))
    }

    /// Row-oriented records, one name → value map per row.
    pub fn to_rows(&self) -> Vec<IndexMap<String, AttrValue>> {
        (0..self.len())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|(name, col)| (name.clone(), col[row].clone()))
                    .collect()
            })
            .collect()
    }

    fn row_range(&self, offset: usize, len: usize) -> ColumnTable {
        let columns = self
            .columns
            .iter()
            .map(|(name, col)| {
                let start = offset.min(col.len());
                let end = offset.saturating_add(len).min(col.len());
                (name.clone(), col[start..end].to_vec())
            })
            .collect();
        ColumnTable { columns }
    }
}

impl Tabular for ColumnTable {
    fn num_rows(&self) -> Result<usize> {
        Ok(self.len())
    }

    fn column_names(&self) -> Result<Vec<String>> {
        Ok(self.columns.keys().cloned().collect())
    }

    fn slice(&self, offset: usize, length: Option<usize>) -> Result<ColumnTable> {
        let length = length.unwrap_or_else(|| self.len().saturating_sub(offset));
        Ok(self.row_range(offset, length))
    }
}
