use thiserror::Error;

use super::identifiers::{ColumnType, TableId};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("No registry entry for table `{table_id}`")]
    TableUnknown { table_id: TableId },
    #[error("Column `{column}` is not defined for table `{table_id}`")]
    ColumnUnknown { table_id: TableId, column: ColumnType },
}
