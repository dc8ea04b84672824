use thiserror::Error;

use crate::catalog::{TableId, TableViewType};
use crate::query::TranslationError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViewError {
    #[error("No view for table `{table_id}` (tenant `{tenant}`, user {user_id:?})")]
    NotFound {
        tenant: String,
        user_id: Option<String>,
        table_id: TableId,
    },
    #[error("View for table `{0}` is a shipped preset and cannot be deleted")]
    Protected(TableId),
    #[error("Table `{0}` is scoped to a user but no user id was supplied")]
    OwnerRequired(TableId),
    #[error("Table `{table_id}` belongs to the {expected} view type, not {found}")]
    TableTypeMismatch {
        table_id: TableId,
        expected: TableViewType,
        found: TableViewType,
    },
    #[error("Board column {index} of `{table_id}` needs both a name and a filter")]
    BoardBucketIncomplete { table_id: TableId, index: usize },
    #[error("Invalid view definition: {0}")]
    Invalid(#[from] TranslationError),
    #[error("View store failure: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for ViewError {
    fn from(err: std::io::Error) -> Self {
        ViewError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::Persistence(err.to_string())
    }
}
