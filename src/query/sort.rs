use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::TranslationError;
use crate::catalog::{ColumnType, GraphPath, TableId, ValueType};

/// Wire form: `{"id": "ORGANIZATIONS_LAST_TOUCHPOINT", "desc": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    #[serde(rename = "id")]
    pub field_id: ColumnType,
    #[serde(rename = "desc", default)]
    pub descending: bool,
}

impl SortField {
    pub fn asc(field_id: ColumnType) -> Self {
        SortField {
            field_id,
            descending: false,
        }
    }

    pub fn desc(field_id: ColumnType) -> Self {
        SortField {
            field_id,
            descending: true,
        }
    }
}

/// Ordered sort keys; the first key is the most significant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(pub Vec<SortField>);

impl SortSpec {
    pub fn fields(&self) -> &[SortField] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes either a single `{"id","desc"}` object or an array of them.
    /// An unknown id is reported against `table_id`.
    pub fn from_wire_str(table_id: TableId, json: &str) -> Result<Self, TranslationError> {
        let invalid = |field: String| TranslationError::SortFieldUnknown { table_id, field };
        let value: Value = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        let items = match value {
            Value::Array(items) => items,
            single => vec![single],
        };

        let mut fields = Vec::with_capacity(items.len());
        for item in items {
            let raw = WireSort::deserialize(&item).map_err(|_| invalid(item.to_string()))?;
            let field_id = raw.id.parse().map_err(|_| invalid(raw.id.clone()))?;
            fields.push(SortField {
                field_id,
                descending: raw.desc,
            });
        }
        Ok(SortSpec(fields))
    }
}

impl From<SortField> for SortSpec {
    fn from(field: SortField) -> Self {
        SortSpec(vec![field])
    }
}

#[derive(Deserialize)]
struct WireSort {
    id: String,
    #[serde(default)]
    desc: bool,
}

/// A sort field after registry resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSort {
    pub column: ColumnType,
    pub path: GraphPath,
    pub value_type: ValueType,
    pub descending: bool,
}
