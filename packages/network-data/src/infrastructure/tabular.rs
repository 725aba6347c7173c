//! Store-backed tabular view.

use crate::defaults::TableKind;
use crate::domain::table::{ColumnTable, Tabular};
use crate::error::Result;
use crate::infrastructure::sqlite::NetworkDataStore;

/// Read-only tabular view over one stored table.
///
/// Every call re-queries the store; nothing is cached. No ordering
/// guarantee beyond what the store returns by default (table scan
/// order), so callers needing stable order must not rely on this
/// adapter alone.
#[derive(Clone)]
pub struct NetworkDataTabular {
    store: NetworkDataStore,
    kind: TableKind,
}

impl NetworkDataTabular {
    pub fn new(store: NetworkDataStore, kind: TableKind) -> Self {
        Self { store, kind }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }
}

impl Tabular for NetworkDataTabular {
    fn num_rows(&self) -> Result<usize> {
        self.store.count_rows(self.kind)
    }

    fn column_names(&self) -> Result<Vec<String>> {
        self.store.table_columns(self.kind)
    }

    fn slice(&self, offset: usize, length: Option<usize>) -> Result<ColumnTable> {
        // "rest of the table" is bounded by the current row count
        let limit = match length {
            Some(length) => length,
            None => self.store.count_rows(self.kind)?,
        };
        self.store.select_slice(self.kind, offset, limit)
    }
}
