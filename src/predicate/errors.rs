use thiserror::Error;

use super::FilterOperation;
use crate::catalog::{ColumnType, TableId};

/// Wire JSON that does not describe a predicate tree.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WireError {
    #[error("Malformed filter JSON: {0}")]
    Malformed(String),
    #[error("Filter node must have exactly one of `AND`, `OR` or `filter`, got {0}")]
    UnexpectedNode(String),
    #[error("Unknown filter property `{0}`")]
    UnknownProperty(String),
    #[error("Unknown filter operation `{0}`")]
    UnknownOperation(String),
    #[error("Unsupported filter value for `{property}`: {value}")]
    UnsupportedValue { property: String, value: String },
}

/// A structurally sound tree that does not fit the table it targets.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    #[error("Property `{property}` is not filterable on table `{table_id}`")]
    PropertyUnknown {
        table_id: TableId,
        property: String,
    },
    #[error("Invalid value for {property} {operation}: {reason}")]
    ValueInvalid {
        property: ColumnType,
        operation: FilterOperation,
        reason: String,
    },
}

impl FilterError {
    pub(crate) fn value_invalid(
        property: ColumnType,
        operation: FilterOperation,
        reason: impl Into<String>,
    ) -> Self {
        FilterError::ValueInvalid {
            property,
            operation,
            reason: reason.into(),
        }
    }
}
