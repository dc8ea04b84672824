use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use super::errors::FilterError;
use super::{Condition, FilterOperation, FilterValue, Predicate, Scalar};
use crate::catalog::{CatalogError, ColumnDefinition, PropertyRegistry, TableId, ValueType};

/// Checks a tree against the columns of `table_id`.
///
/// Every leaf must name a filterable column of the table, carry an operand
/// shaped for its operation, and use an operation the column's value type
/// supports. Empty groups are valid and match everything.
pub fn validate(
    node: &Predicate,
    registry: &PropertyRegistry,
    table_id: TableId,
) -> Result<(), FilterError> {
    match node {
        Predicate::Group { children, .. } => children
            .iter()
            .try_for_each(|child| validate(child, registry, table_id)),
        Predicate::Leaf(condition) => validate_condition(condition, registry, table_id),
    }
}

fn validate_condition(
    condition: &Condition,
    registry: &PropertyRegistry,
    table_id: TableId,
) -> Result<(), FilterError> {
    let column = registry
        .resolve(table_id, condition.property)
        .map_err(|e| match e {
            CatalogError::TableUnknown { .. } | CatalogError::ColumnUnknown { .. } => {
                FilterError::PropertyUnknown {
                    table_id,
                    property: condition.property.to_string(),
                }
            }
        })?;
    if !column.filterable {
        return Err(FilterError::PropertyUnknown {
            table_id,
            property: condition.property.to_string(),
        });
    }

    check_shape(condition)?;
    check_operation(condition, column)?;
    for scalar in condition.value.scalars() {
        check_scalar(condition, column, scalar)?;
    }
    Ok(())
}

fn check_shape(condition: &Condition) -> Result<(), FilterError> {
    let invalid = |reason: &str| {
        Err(FilterError::value_invalid(
            condition.property,
            condition.operation,
            reason,
        ))
    };
    match (condition.operation, &condition.value) {
        (FilterOperation::IsEmpty, FilterValue::None) => Ok(()),
        (FilterOperation::IsEmpty, _) => invalid("IS_EMPTY takes no value"),
        (FilterOperation::In, FilterValue::List(items)) if !items.is_empty() => Ok(()),
        (FilterOperation::In, _) => invalid("IN needs a list of at least one element"),
        (FilterOperation::Between, FilterValue::List(items)) if items.len() == 2 => Ok(()),
        (FilterOperation::Between, _) => invalid("BETWEEN needs a list of exactly two elements"),
        (_, FilterValue::Scalar(_)) => Ok(()),
        (_, FilterValue::None) => invalid("a value is required"),
        (_, FilterValue::List(_)) => invalid("a single scalar value is required"),
    }
}

fn check_operation(condition: &Condition, column: &ColumnDefinition) -> Result<(), FilterError> {
    let supported = match condition.operation {
        FilterOperation::Contains | FilterOperation::StartsWith => column.value_type.is_textual(),
        FilterOperation::Gte | FilterOperation::Lte | FilterOperation::Between => {
            column.value_type.is_ordered()
        }
        FilterOperation::Eq
        | FilterOperation::Neq
        | FilterOperation::In
        | FilterOperation::IsEmpty => true,
    };
    if supported {
        Ok(())
    } else {
        Err(FilterError::value_invalid(
            condition.property,
            condition.operation,
            format!("not supported on {:?} columns", column.value_type),
        ))
    }
}

fn check_scalar(
    condition: &Condition,
    column: &ColumnDefinition,
    scalar: &Scalar,
) -> Result<(), FilterError> {
    let ok = match (column.value_type, scalar) {
        (ValueType::String | ValueType::StringList, Scalar::Str(_)) => true,
        (ValueType::Integer, Scalar::Int(_)) => true,
        (ValueType::Float, Scalar::Int(_)) => true,
        (ValueType::Float, Scalar::Float(f)) => f.is_finite(),
        (ValueType::Boolean, Scalar::Bool(_)) => true,
        (ValueType::Date, Scalar::Str(s)) => parse_date(s).is_some(),
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(FilterError::value_invalid(
            condition.property,
            condition.operation,
            format!("{:?} does not fit a {:?} column", scalar, column.value_type),
        ))
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; returns the calendar date.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    bare_date(value).or_else(|| parse_instant(value).map(|dt| dt.date_naive()))
}

/// A `YYYY-MM-DD` value with no time part.
pub(crate) fn bare_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub(crate) fn parse_instant(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// Position of a date value on the timeline; bare dates sit at midnight UTC.
pub(crate) fn date_instant(value: &str) -> Option<DateTime<Utc>> {
    match parse_instant(value) {
        Some(dt) => Some(dt.with_timezone(&Utc)),
        None => Some(Utc.from_utc_datetime(&bare_date(value)?.and_hms_opt(0, 0, 0)?)),
    }
}

/// Compares a stored date against a filter bound. A bare-date bound compares
/// by calendar day, so `LTE 2024-01-31` keeps the whole of that day; any other
/// bound compares instants.
pub(crate) fn compare_date_bound(value: &str, bound: &str) -> Option<Ordering> {
    match bare_date(bound) {
        Some(day) => Some(parse_date(value)?.cmp(&day)),
        None => Some(date_instant(value)?.cmp(&date_instant(bound)?)),
    }
}
