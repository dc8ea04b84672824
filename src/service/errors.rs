use serde::Serialize;
use thiserror::Error;

use crate::executor::StoreError;
use crate::query::TranslationError;
use crate::views::ViewError;

/// Flat error taxonomy shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    TableUnknown,
    FilterPropertyUnknown,
    FilterValueInvalid,
    SortFieldUnknown,
    PaginationInvalid,
    OwnerRequired,
    ViewDefinitionNotFound,
    ViewDefinitionProtected,
    ViewDefinitionInvalid,
    StoreUnavailable,
    StoreFailure,
    Cancelled,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Translation(e) => translation_kind(e),
            ServiceError::View(e) => match e {
                ViewError::NotFound { .. } => ErrorKind::ViewDefinitionNotFound,
                ViewError::Protected(_) => ErrorKind::ViewDefinitionProtected,
                ViewError::OwnerRequired(_) => ErrorKind::OwnerRequired,
                ViewError::TableTypeMismatch { .. } | ViewError::BoardBucketIncomplete { .. } => {
                    ErrorKind::ViewDefinitionInvalid
                }
                ViewError::Invalid(inner) => translation_kind(inner),
                ViewError::Persistence(_) => ErrorKind::StoreFailure,
            },
            ServiceError::Store(e) => match e {
                StoreError::Unavailable(_) => ErrorKind::StoreUnavailable,
                StoreError::Cancelled => ErrorKind::Cancelled,
                StoreError::Corrupt(_) => ErrorKind::StoreFailure,
            },
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}

fn translation_kind(err: &TranslationError) -> ErrorKind {
    match err {
        TranslationError::TableUnknown(_) => ErrorKind::TableUnknown,
        TranslationError::FilterPropertyUnknown { .. } => ErrorKind::FilterPropertyUnknown,
        TranslationError::FilterValueInvalid { .. } => ErrorKind::FilterValueInvalid,
        TranslationError::SortFieldUnknown { .. } => ErrorKind::SortFieldUnknown,
        TranslationError::PaginationInvalid { .. } => ErrorKind::PaginationInvalid,
        TranslationError::OwnerRequired(_) => ErrorKind::OwnerRequired,
        TranslationError::Cancelled => ErrorKind::Cancelled,
    }
}
