use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{ColumnType, TableId, TableViewType};
use crate::predicate::Predicate;
use crate::query::{SortField, SortSpec};

/// One column of a view's layout. On board views the column is a named
/// bucket and `filter` selects the rows that fall into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub column_type: ColumnType,
    pub width: u32,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
}

impl ColumnView {
    pub fn new(column_type: ColumnType, width: u32, visible: bool) -> Self {
        ColumnView {
            column_type,
            width,
            visible,
            name: None,
            filter: None,
        }
    }

    pub fn bucket(column_type: ColumnType, width: u32, name: impl Into<String>, filter: Predicate) -> Self {
        ColumnView {
            column_type,
            width,
            visible: true,
            name: Some(name.into()),
            filter: Some(filter),
        }
    }
}

/// Storage key: `user_id` is present exactly for owner-scoped tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewKey {
    pub tenant: String,
    pub user_id: Option<String>,
    pub table_id: TableId,
}

impl ViewKey {
    pub fn new(tenant: impl Into<String>, user_id: Option<String>, table_id: TableId) -> Self {
        ViewKey {
            tenant: tenant.into(),
            user_id,
            table_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableViewDefinition {
    pub id: Uuid,
    pub tenant: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub table_type: TableViewType,
    pub table_id: TableId,
    pub name: String,
    pub columns: Vec<ColumnView>,
    #[serde(default)]
    pub default_filter: Option<Predicate>,
    #[serde(default)]
    pub default_sort: Option<SortField>,
    #[serde(default)]
    pub filter_override: Option<Predicate>,
    #[serde(default)]
    pub sort_override: Option<SortField>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub is_preset: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Board bucket borrowed from a view's columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardBucket<'a> {
    pub column_type: ColumnType,
    pub name: &'a str,
    pub filter: &'a Predicate,
    pub width: u32,
    pub visible: bool,
}

/// How a front end lays a view out.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendering<'a> {
    Grid(&'a [ColumnView]),
    Board(Vec<BoardBucket<'a>>),
}

impl TableViewDefinition {
    pub fn new(
        tenant: impl Into<String>,
        user_id: Option<String>,
        table_type: TableViewType,
        table_id: TableId,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        TableViewDefinition {
            id: Uuid::new_v4(),
            tenant: tenant.into(),
            user_id,
            table_type,
            table_id,
            name: name.into(),
            columns: Vec::new(),
            default_filter: None,
            default_sort: None,
            filter_override: None,
            sort_override: None,
            icon: String::new(),
            order: 0,
            is_preset: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> ViewKey {
        ViewKey::new(self.tenant.clone(), self.user_id.clone(), self.table_id)
    }

    /// The user's override when set, else the shipped default.
    pub fn effective_filter(&self) -> Option<&Predicate> {
        self.filter_override.as_ref().or(self.default_filter.as_ref())
    }

    pub fn effective_sort(&self) -> Option<SortSpec> {
        self.sort_override.or(self.default_sort).map(SortSpec::from)
    }

    pub fn is_board(&self) -> bool {
        self.table_type == TableViewType::Opportunities
    }

    pub fn rendering(&self) -> Rendering<'_> {
        if !self.is_board() {
            return Rendering::Grid(&self.columns);
        }
        let buckets = self
            .columns
            .iter()
            .filter_map(|c| match (&c.name, &c.filter) {
                (Some(name), Some(filter)) => Some(BoardBucket {
                    column_type: c.column_type,
                    name,
                    filter,
                    width: c.width,
                    visible: c.visible,
                }),
                _ => None,
            })
            .collect();
        Rendering::Board(buckets)
    }

    /// Folds an incoming write over the stored record. Identity, creation
    /// time and the preset flag survive; everything else is last-writer-wins.
    pub(crate) fn merged_over(mut self, existing: Option<&TableViewDefinition>) -> Self {
        let now = Utc::now();
        match existing {
            Some(current) => {
                self.id = current.id;
                self.created_at = current.created_at;
                self.is_preset = current.is_preset || self.is_preset;
            }
            None => self.created_at = now,
        }
        self.updated_at = now;
        self
    }

    /// Copies the shipped, structural fields of `preset` onto a stored view.
    /// Layout, name and user overrides are left alone. Returns whether
    /// anything changed.
    pub(crate) fn refresh_from(&mut self, preset: &TableViewDefinition) -> bool {
        let changed = self.table_type != preset.table_type
            || self.default_filter != preset.default_filter
            || self.default_sort != preset.default_sort
            || self.icon != preset.icon
            || self.order != preset.order
            || !self.is_preset;
        if changed {
            self.table_type = preset.table_type;
            self.default_filter = preset.default_filter.clone();
            self.default_sort = preset.default_sort;
            self.icon = preset.icon.clone();
            self.order = preset.order;
            self.is_preset = true;
            self.updated_at = Utc::now();
        }
        changed
    }
}
