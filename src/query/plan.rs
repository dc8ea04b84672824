use serde::Serialize;
use serde_json::{Map, Value};

use super::pagination::Window;
use super::sort::ResolvedSort;
use crate::catalog::{ColumnType, GraphPath, TableId, ValueType};
use crate::predicate::{Combinator, FilterOperation, FilterValue};

/// Where a resolved leaf came from. Scope leaves bind named parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOrigin {
    Tenant,
    Owner,
    Base,
    Filter(ColumnType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCondition {
    pub origin: ConditionOrigin,
    pub path: GraphPath,
    pub value_type: ValueType,
    pub operation: FilterOperation,
    pub value: FilterValue,
    pub include_empty: bool,
}

/// Predicate tree with every leaf bound to a graph path.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPredicate {
    Group {
        combinator: Combinator,
        children: Vec<ResolvedPredicate>,
    },
    Leaf(ResolvedCondition),
}

impl ResolvedPredicate {
    pub fn leaves(&self) -> Vec<&ResolvedCondition> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                ResolvedPredicate::Leaf(c) => out.push(c),
                ResolvedPredicate::Group { children, .. } => {
                    stack.extend(children.iter().rev());
                }
            }
        }
        out
    }
}

/// Cypher text plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CypherQuery {
    pub text: String,
    pub params: Map<String, Value>,
}

/// A fully validated request, ready for a `GraphExecutor`.
///
/// `count` and `data` share the same MATCH/WHERE text and predicate
/// parameters; `data` additionally binds `$skip`/`$limit` when bounded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutablePlan {
    pub table_id: TableId,
    pub root_label: &'static str,
    pub predicate: ResolvedPredicate,
    pub sort: Vec<ResolvedSort>,
    pub window: Window,
    pub count: CypherQuery,
    pub data: CypherQuery,
}

impl ExecutablePlan {
    /// Plans only ever read; retry policies rely on this.
    pub fn is_read_only(&self) -> bool {
        true
    }
}
