use std::collections::HashMap;

use lazy_static::lazy_static;

use super::column::{ColumnDefinition, TableDefinition};
use super::errors::CatalogError;
use super::identifiers::{ColumnType, TableId};
use super::tables::TABLES;

lazy_static! {
    static ref GLOBAL_REGISTRY: PropertyRegistry = PropertyRegistry::new(TABLES);
}

/// The process-wide registry, built on first use from the static table.
pub fn registry() -> &'static PropertyRegistry {
    &GLOBAL_REGISTRY
}

/// Read-only catalog of tables and columns.
///
/// Holds only `&'static` data and is never mutated after construction, so a
/// shared reference can be read from any number of threads without locking.
#[derive(Debug)]
pub struct PropertyRegistry {
    tables: HashMap<TableId, &'static TableDefinition>,
}

impl PropertyRegistry {
    pub fn new(definitions: &'static [TableDefinition]) -> Self {
        let mut tables = HashMap::with_capacity(definitions.len());
        for def in definitions {
            if tables.insert(def.table_id, def).is_some() {
                log::warn!("Duplicate registry entry for {}, keeping the last one", def.table_id);
            }
        }
        PropertyRegistry { tables }
    }

    pub fn table(&self, table_id: TableId) -> Result<&'static TableDefinition, CatalogError> {
        self.tables
            .get(&table_id)
            .copied()
            .ok_or(CatalogError::TableUnknown { table_id })
    }

    /// Columns of `table_id` in display order.
    pub fn columns_for(
        &self,
        table_id: TableId,
    ) -> Result<&'static [ColumnDefinition], CatalogError> {
        Ok(self.table(table_id)?.columns)
    }

    pub fn resolve(
        &self,
        table_id: TableId,
        column: ColumnType,
    ) -> Result<&'static ColumnDefinition, CatalogError> {
        self.table(table_id)?
            .columns
            .iter()
            .find(|c| c.column_type == column)
            .ok_or(CatalogError::ColumnUnknown { table_id, column })
    }

    pub fn table_ids(&self) -> impl Iterator<Item = TableId> + '_ {
        self.tables.keys().copied()
    }
}
