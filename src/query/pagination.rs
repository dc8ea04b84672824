//! Page/limit contract.
//!
//! Pages are 1-based and `page = 0` is read as the first page. `limit = 0`
//! means unbounded: the whole result set is one page.

use serde::{Deserialize, Serialize};

use super::errors::TranslationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        PageRequest { page, limit }
    }

    pub fn unbounded() -> Self {
        PageRequest { page: 0, limit: 0 }
    }

    pub fn window(&self) -> Result<Window, TranslationError> {
        if self.page < 0 || self.limit < 0 {
            return Err(TranslationError::PaginationInvalid {
                page: self.page,
                limit: self.limit,
            });
        }
        if self.limit == 0 {
            return Ok(Window {
                skip: 0,
                limit: None,
            });
        }
        let limit = self.limit as u64;
        let skip = (self.page.max(1) as u64 - 1)
            .checked_mul(limit)
            .ok_or(TranslationError::PaginationInvalid {
                page: self.page,
                limit: self.limit,
            })?;
        Ok(Window {
            skip,
            limit: Some(limit),
        })
    }
}

/// Rows to skip and the maximum to return; `limit = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Window {
    pub fn total_pages(&self, total_elements: u64) -> u64 {
        total_pages(total_elements, self.limit.unwrap_or(0))
    }
}

/// `0` for an empty result, `1` when unbounded, else `ceil(total / limit)`.
pub fn total_pages(total_elements: u64, limit: u64) -> u64 {
    if total_elements == 0 {
        0
    } else if limit == 0 {
        1
    } else {
        total_elements.div_ceil(limit)
    }
}

/// One page of typed rows plus totals for the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> PageResult<T> {
    pub fn new(content: Vec<T>, total_elements: u64, window: &Window) -> Self {
        PageResult {
            content,
            total_elements,
            total_pages: window.total_pages(total_elements),
        }
    }

    pub fn empty() -> Self {
        PageResult {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResult<U> {
        PageResult {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn try_map<U, E, F: FnMut(T) -> Result<U, E>>(self, f: F) -> Result<PageResult<U>, E> {
        Ok(PageResult {
            content: self.content.into_iter().map(f).collect::<Result<Vec<_>, E>>()?,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        })
    }
}
