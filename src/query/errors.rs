use thiserror::Error;

use crate::catalog::{CatalogError, TableId};
use crate::predicate::{FilterError, FilterOperation, WireError};

/// Everything that can stop a request before the store is touched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    #[error("Unknown table `{0}`")]
    TableUnknown(String),
    #[error("Property `{property}` is not filterable on table `{table_id}`")]
    FilterPropertyUnknown { table_id: TableId, property: String },
    #[error("Invalid filter on {property} ({operation:?}): {reason}")]
    FilterValueInvalid {
        property: String,
        operation: Option<FilterOperation>,
        reason: String,
    },
    #[error("Field `{field}` is not sortable on table `{table_id}`")]
    SortFieldUnknown { table_id: TableId, field: String },
    #[error("Invalid pagination: page={page}, limit={limit}")]
    PaginationInvalid { page: i64, limit: i64 },
    #[error("Table `{0}` is scoped to a user but no user id was supplied")]
    OwnerRequired(TableId),
    #[error("Translation cancelled")]
    Cancelled,
}

impl TranslationError {
    /// Wire errors carry no table; the caller supplies the one being queried.
    pub fn from_wire(table_id: TableId, err: WireError) -> Self {
        match err {
            WireError::UnknownProperty(property) => {
                TranslationError::FilterPropertyUnknown { table_id, property }
            }
            WireError::UnsupportedValue { property, value } => TranslationError::FilterValueInvalid {
                property,
                operation: None,
                reason: format!("unsupported value {}", value),
            },
            other => TranslationError::FilterValueInvalid {
                property: "<filter>".to_string(),
                operation: None,
                reason: other.to_string(),
            },
        }
    }
}

impl From<FilterError> for TranslationError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::PropertyUnknown { table_id, property } => {
                TranslationError::FilterPropertyUnknown { table_id, property }
            }
            FilterError::ValueInvalid {
                property,
                operation,
                reason,
            } => TranslationError::FilterValueInvalid {
                property: property.to_string(),
                operation: Some(operation),
                reason,
            },
        }
    }
}

impl From<CatalogError> for TranslationError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::TableUnknown { table_id } => {
                TranslationError::TableUnknown(table_id.to_string())
            }
            CatalogError::ColumnUnknown { table_id, column } => {
                TranslationError::FilterPropertyUnknown {
                    table_id,
                    property: column.to_string(),
                }
            }
        }
    }
}
