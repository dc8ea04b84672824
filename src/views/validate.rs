use super::definition::TableViewDefinition;
use super::errors::ViewError;
use crate::catalog::{PropertyRegistry, TableDefinition};
use crate::predicate::{self, Predicate};
use crate::query::{SortField, TranslationError};

/// Checks a definition against the registry before it is persisted.
///
/// Columns must exist on the table; stored filters and sorts must be ones
/// the translator would accept; board views need a name and filter on every
/// bucket.
pub fn validate_definition(
    def: &TableViewDefinition,
    registry: &PropertyRegistry,
) -> Result<(), ViewError> {
    let table = registry.table(def.table_id).map_err(TranslationError::from)?;

    if table.view_type != def.table_type {
        return Err(ViewError::TableTypeMismatch {
            table_id: def.table_id,
            expected: table.view_type,
            found: def.table_type,
        });
    }
    if table.is_owner_scoped() && def.user_id.is_none() {
        return Err(ViewError::OwnerRequired(def.table_id));
    }

    for column in &def.columns {
        registry
            .resolve(def.table_id, column.column_type)
            .map_err(TranslationError::from)?;
    }

    for filter in [&def.default_filter, &def.filter_override].into_iter().flatten() {
        check_filter(filter, registry, table)?;
    }
    for sort in [&def.default_sort, &def.sort_override].into_iter().flatten() {
        check_sort(sort, table)?;
    }

    if def.is_board() {
        for (index, column) in def.columns.iter().enumerate() {
            match (&column.name, &column.filter) {
                (Some(_), Some(filter)) => check_filter(filter, registry, table)?,
                _ => {
                    return Err(ViewError::BoardBucketIncomplete {
                        table_id: def.table_id,
                        index,
                    })
                }
            }
        }
    }
    Ok(())
}

fn check_filter(
    filter: &Predicate,
    registry: &PropertyRegistry,
    table: &TableDefinition,
) -> Result<(), ViewError> {
    predicate::validate(filter, registry, table.table_id)
        .map_err(|e| ViewError::Invalid(TranslationError::from(e)))
}

fn check_sort(sort: &SortField, table: &TableDefinition) -> Result<(), ViewError> {
    match table.column(sort.field_id) {
        Some(column) if column.sortable => Ok(()),
        _ => Err(ViewError::Invalid(TranslationError::SortFieldUnknown {
            table_id: table.table_id,
            field: sort.field_id.to_string(),
        })),
    }
}
