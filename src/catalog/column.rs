use serde::{Deserialize, Serialize};

use super::graph_path::GraphPath;
use super::identifiers::{ColumnType, TableId, TableViewType};
use crate::predicate::FilterOperation;

/// Scalar kind stored at a column's property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    String,
    Integer,
    Float,
    Boolean,
    /// ISO-8601 date or RFC 3339 timestamp, stored as a string.
    Date,
    StringList,
}

impl ValueType {
    pub fn is_textual(&self) -> bool {
        matches!(self, ValueType::String | ValueType::StringList)
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Float | ValueType::Date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDefinition {
    pub column_type: ColumnType,
    pub path: GraphPath,
    pub value_type: ValueType,
    pub sortable: bool,
    pub filterable: bool,
    pub default_width: u32,
    pub default_visible: bool,
}

impl ColumnDefinition {
    /// Sortable, filterable, visible, 100px wide.
    pub const fn new(column_type: ColumnType, path: GraphPath, value_type: ValueType) -> Self {
        ColumnDefinition {
            column_type,
            path,
            value_type,
            sortable: true,
            filterable: true,
            default_width: 100,
            default_visible: true,
        }
    }

    pub const fn width(self, default_width: u32) -> Self {
        ColumnDefinition {
            default_width,
            ..self
        }
    }

    pub const fn hidden(self) -> Self {
        ColumnDefinition {
            default_visible: false,
            ..self
        }
    }

    /// Shown in the grid but neither filterable nor sortable (avatars, previews).
    pub const fn display_only(self) -> Self {
        ColumnDefinition {
            sortable: false,
            filterable: false,
            ..self
        }
    }

    pub const fn unsortable(self) -> Self {
        ColumnDefinition {
            sortable: false,
            ..self
        }
    }
}

/// Fixed value of a base condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseValue {
    Bool(bool),
    Str(&'static str),
}

/// Condition always ANDed into every query against a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseCondition {
    pub path: GraphPath,
    pub value_type: ValueType,
    pub operation: FilterOperation,
    pub value: BaseValue,
    pub include_empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableDefinition {
    pub table_id: TableId,
    pub view_type: TableViewType,
    pub root_label: &'static str,
    /// Path from the root node to the `Tenant` name.
    pub tenant_path: GraphPath,
    /// Present only for tables scoped to the requesting user.
    pub owner_path: Option<GraphPath>,
    pub base_conditions: &'static [BaseCondition],
    pub columns: &'static [ColumnDefinition],
}

impl TableDefinition {
    pub fn is_owner_scoped(&self) -> bool {
        self.owner_path.is_some()
    }

    pub fn column(&self, column_type: ColumnType) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.column_type == column_type)
    }
}
