//! Filter grammar: boolean groups over leaf conditions.
//!
//! The tree is independent of any entity type. Column ids are checked against
//! a table only by [`validate`]; how a column reaches the graph is decided by
//! the translator.

pub mod errors;
pub mod validate;
pub mod wire;

pub use errors::{FilterError, WireError};
pub use validate::validate;

use crate::catalog::ColumnType;
use crate::wire_enum;

wire_enum! {
    pub enum FilterOperation {
        Eq => "EQ",
        Neq => "NEQ",
        Contains => "CONTAINS",
        StartsWith => "STARTS_WITH",
        Gte => "GTE",
        Lte => "LTE",
        Between => "BETWEEN",
        In => "IN",
        IsEmpty => "IS_EMPTY",
    }
}

wire_enum! {
    pub enum Combinator {
        And => "AND",
        Or => "OR",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Leaf operand: nothing (IS_EMPTY), one scalar, or a list (IN, BETWEEN).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    #[default]
    None,
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl From<Scalar> for FilterValue {
    fn from(value: Scalar) -> Self {
        FilterValue::Scalar(value)
    }
}

macro_rules! scalar_filter_value {
    ($($t:ty),*) => {
        $(impl From<$t> for FilterValue {
            fn from(value: $t) -> Self {
                FilterValue::Scalar(value.into())
            }
        })*
    };
}

scalar_filter_value!(&str, String, i64, f64, bool);

impl FilterValue {
    pub fn list<T: Into<Scalar>>(items: impl IntoIterator<Item = T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn scalars(&self) -> &[Scalar] {
        match self {
            FilterValue::None => &[],
            FilterValue::Scalar(s) => std::slice::from_ref(s),
            FilterValue::List(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub property: ColumnType,
    pub operation: FilterOperation,
    pub value: FilterValue,
    /// Entities lacking the property also satisfy the leaf.
    pub include_empty: bool,
}

impl Condition {
    pub fn new(property: ColumnType, operation: FilterOperation, value: impl Into<FilterValue>) -> Self {
        Condition {
            property,
            operation,
            value: value.into(),
            include_empty: false,
        }
    }

    pub fn is_empty(property: ColumnType) -> Self {
        Condition {
            property,
            operation: FilterOperation::IsEmpty,
            value: FilterValue::None,
            include_empty: false,
        }
    }

    pub fn include_empty(mut self) -> Self {
        self.include_empty = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Group {
        combinator: Combinator,
        children: Vec<Predicate>,
    },
    Leaf(Condition),
}

impl Predicate {
    /// Empty AND group; matches every entity.
    pub fn match_all() -> Self {
        Predicate::and(Vec::new())
    }

    pub fn and(children: Vec<Predicate>) -> Self {
        Predicate::Group {
            combinator: Combinator::And,
            children,
        }
    }

    pub fn or(children: Vec<Predicate>) -> Self {
        Predicate::Group {
            combinator: Combinator::Or,
            children,
        }
    }

    pub fn leaf(condition: Condition) -> Self {
        Predicate::Leaf(condition)
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::Group { combinator: Combinator::And, children } if children.is_empty())
    }

    /// Leaves in document order.
    pub fn leaves(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Predicate::Leaf(c) => out.push(c),
            Predicate::Group { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Rewrites every string leaf value equal to `placeholder`.
    pub fn substitute(&mut self, placeholder: &str, replacement: &str) {
        match self {
            Predicate::Leaf(condition) => {
                let scalars: &mut [Scalar] = match &mut condition.value {
                    FilterValue::None => &mut [],
                    FilterValue::Scalar(s) => std::slice::from_mut(s),
                    FilterValue::List(items) => items.as_mut_slice(),
                };
                for scalar in scalars {
                    if scalar.as_str() == Some(placeholder) {
                        *scalar = Scalar::Str(replacement.to_string());
                    }
                }
            }
            Predicate::Group { children, .. } => {
                for child in children {
                    child.substitute(placeholder, replacement);
                }
            }
        }
    }
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Predicate::Leaf(condition)
    }
}
