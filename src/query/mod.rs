//! Translation of filters, sorts and pages into executable Cypher plans.

mod cypher;
pub mod errors;
pub mod pagination;
pub mod plan;
pub mod sort;
pub mod translator;

pub use errors::TranslationError;
pub use pagination::{total_pages, PageRequest, PageResult, Window};
pub use plan::{ConditionOrigin, CypherQuery, ExecutablePlan, ResolvedCondition, ResolvedPredicate};
pub use sort::{ResolvedSort, SortField, SortSpec};
pub use translator::{TenantScope, TranslationRequest, Translator};

use crate::catalog::TableId;
use crate::predicate::Predicate;

/// Decodes a wire filter, reporting problems against `table_id`.
pub fn decode_filter(table_id: TableId, json: &str) -> Result<Predicate, TranslationError> {
    Predicate::from_wire_str(json).map_err(|e| TranslationError::from_wire(table_id, e))
}
