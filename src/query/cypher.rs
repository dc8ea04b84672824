//! Renders resolved plans to parameterised Cypher.
//!
//! The root entity is always bound to `e`. Leaves on the root read `e.<prop>`
//! directly; leaves behind a traversal become `EXISTS { MATCH ... }`
//! subqueries so the outer row count is never multiplied by related nodes.
//! Values are bound as parameters, never interpolated.

use serde_json::{Map, Value};

use super::pagination::Window;
use super::plan::{ConditionOrigin, CypherQuery, ResolvedCondition, ResolvedPredicate};
use super::sort::ResolvedSort;
use crate::catalog::ValueType;
use crate::predicate::validate::bare_date;
use crate::predicate::wire::encode_scalar;
use crate::predicate::{Combinator, FilterOperation, FilterValue, Scalar};

pub(crate) const ROOT: &str = "e";

pub(crate) fn render(
    root_label: &str,
    predicate: &ResolvedPredicate,
    sort: &[ResolvedSort],
    window: &Window,
) -> (CypherQuery, CypherQuery) {
    let mut writer = CypherWriter::default();
    let condition = writer.predicate(predicate);
    let match_where = format!("MATCH ({}:{})\nWHERE {}", ROOT, root_label, condition);

    let count = CypherQuery {
        text: format!("{}\nRETURN count({}) AS total", match_where, ROOT),
        params: writer.params.clone(),
    };

    let mut text = match_where;
    let mut carried = Vec::new();
    let mut projected = Vec::new();
    let mut order = Vec::new();
    for (i, key) in sort.iter().enumerate() {
        let name = format!("sort_{}", i);
        let direction = if key.descending { "DESC" } else { "ASC" };
        if key.path.is_traversal() {
            let alias = format!("s{}", i);
            let aggregate = if key.descending { "max" } else { "min" };
            text.push_str(&format!(
                "\nCALL {{ WITH {root} OPTIONAL MATCH {pattern} RETURN {agg}({value}) AS {name} }}",
                root = ROOT,
                pattern = key.path.pattern(ROOT, &alias),
                agg = aggregate,
                value = sortable_value(&format!("{}.{}", alias, key.path.property), key.value_type),
                name = name,
            ));
            carried.push(name.clone());
        } else {
            let value = format!("{}.{}", ROOT, key.path.property);
            projected.push(format!("{} AS {}", sortable_value(&value, key.value_type), name));
        }
        order.push(format!("{name} IS NULL, {name} {direction}"));
    }
    if !sort.is_empty() {
        let mut with = vec![ROOT.to_string()];
        with.extend(carried);
        with.extend(projected);
        text.push_str(&format!("\nWITH {}", with.join(", ")));
    }
    order.push(format!("{}.id ASC", ROOT));
    text.push_str(&format!("\nRETURN {}\nORDER BY {}", ROOT, order.join(", ")));

    let mut params = writer.params;
    if let Some(limit) = window.limit {
        text.push_str("\nSKIP $skip LIMIT $limit");
        params.insert("skip".to_string(), Value::from(window.skip));
        params.insert("limit".to_string(), Value::from(limit));
    }

    (count, CypherQuery { text, params })
}

/// Empty strings sort with nulls.
fn sortable_value(expr: &str, value_type: ValueType) -> String {
    match value_type {
        ValueType::String => format!("CASE {} WHEN '' THEN null ELSE {} END", expr, expr),
        ValueType::Date => date_value(expr),
        _ => expr.to_string(),
    }
}

/// A stored date as a temporal value; empty strings become null.
fn date_value(expr: &str) -> String {
    format!("datetime(CASE {} WHEN '' THEN null ELSE {} END)", expr, expr)
}

#[derive(Default)]
struct CypherWriter {
    params: Map<String, Value>,
    next_param: usize,
    next_alias: usize,
}

impl CypherWriter {
    fn predicate(&mut self, node: &ResolvedPredicate) -> String {
        match node {
            ResolvedPredicate::Leaf(condition) => self.condition(condition),
            ResolvedPredicate::Group {
                combinator,
                children,
            } => {
                if children.is_empty() {
                    return "true".to_string();
                }
                let parts: Vec<String> = children.iter().map(|c| self.predicate(c)).collect();
                if parts.len() == 1 {
                    return parts.into_iter().next().unwrap_or_default();
                }
                let joiner = match combinator {
                    Combinator::And => " AND ",
                    Combinator::Or => " OR ",
                };
                format!("({})", parts.join(joiner))
            }
        }
    }

    fn bind(&mut self, origin: ConditionOrigin, value: Value) -> String {
        let name = match origin {
            ConditionOrigin::Tenant => "tenant".to_string(),
            ConditionOrigin::Owner => "owner".to_string(),
            ConditionOrigin::Base | ConditionOrigin::Filter(_) => {
                let name = format!("p{}", self.next_param);
                self.next_param += 1;
                name
            }
        };
        self.params.insert(name.clone(), value);
        format!("${}", name)
    }

    fn bind_value(&mut self, origin: ConditionOrigin, value: &FilterValue) -> String {
        let json = match value {
            FilterValue::None => Value::Null,
            FilterValue::Scalar(s) => encode_scalar(s),
            FilterValue::List(items) => Value::Array(items.iter().map(encode_scalar).collect()),
        };
        self.bind(origin, json)
    }

    fn bind_scalar(&mut self, origin: ConditionOrigin, scalar: Option<&Scalar>) -> String {
        let json = scalar.map(encode_scalar).unwrap_or(Value::Null);
        self.bind(origin, json)
    }

    fn condition(&mut self, c: &ResolvedCondition) -> String {
        if !c.path.is_traversal() {
            let x = format!("{}.{}", ROOT, c.path.property);
            let empty = empty_check(&x, c.value_type);
            if c.operation == FilterOperation::IsEmpty {
                return empty;
            }
            let test = self.test(c, &x, c.operation);
            let test = if c.operation == FilterOperation::Neq {
                format!("(NOT {} AND {})", empty, test)
            } else {
                test
            };
            return if c.include_empty {
                format!("({} OR {})", test, empty)
            } else {
                test
            };
        }

        let alias = format!("t{}", self.next_alias);
        self.next_alias += 1;
        let pattern = c.path.pattern(ROOT, &alias);
        let x = format!("{}.{}", alias, c.path.property);
        let present = format!(
            "EXISTS {{ MATCH {} WHERE NOT {} }}",
            pattern,
            empty_check(&x, c.value_type)
        );
        if c.operation == FilterOperation::IsEmpty {
            return format!("NOT {}", present);
        }
        let test = if c.operation == FilterOperation::Neq {
            let equal = self.test(c, &x, FilterOperation::Eq);
            format!("({} AND NOT EXISTS {{ MATCH {} WHERE {} }})", present, pattern, equal)
        } else {
            let test = self.test(c, &x, c.operation);
            format!("EXISTS {{ MATCH {} WHERE {} }}", pattern, test)
        };
        if c.include_empty {
            format!("({} OR NOT {})", test, present)
        } else {
            test
        }
    }

    /// Ordered comparison of `x` against one bound. Dates compare as
    /// instants, or by calendar day when the bound is a bare date.
    fn bound(&mut self, c: &ResolvedCondition, x: &str, scalar: Option<&Scalar>, op: &str) -> String {
        let p = self.bind_scalar(c.origin, scalar);
        if c.value_type != ValueType::Date {
            return format!("{} {} {}", x, op, p);
        }
        match scalar.and_then(Scalar::as_str).and_then(bare_date) {
            Some(_) => format!("date({}) {} date({})", date_value(x), op, p),
            None => format!("{} {} datetime({})", date_value(x), op, p),
        }
    }

    /// Comparison of `x` against the leaf's operand under `operation`.
    fn test(&mut self, c: &ResolvedCondition, x: &str, operation: FilterOperation) -> String {
        let list = c.value_type == ValueType::StringList;
        match operation {
            FilterOperation::Eq => {
                let p = self.bind_value(c.origin, &c.value);
                if list {
                    format!("{} IN {}", p, x)
                } else {
                    format!("{} = {}", x, p)
                }
            }
            FilterOperation::Neq => {
                let p = self.bind_value(c.origin, &c.value);
                if list {
                    format!("NOT {} IN {}", p, x)
                } else {
                    format!("{} <> {}", x, p)
                }
            }
            FilterOperation::Contains | FilterOperation::StartsWith => {
                let p = self.bind_value(c.origin, &c.value);
                let op = if operation == FilterOperation::Contains {
                    "CONTAINS"
                } else {
                    "STARTS WITH"
                };
                if list {
                    format!("ANY(v IN {} WHERE toLower(v) {} toLower({}))", x, op, p)
                } else {
                    format!("toLower({}) {} toLower({})", x, op, p)
                }
            }
            FilterOperation::Gte => self.bound(c, x, c.value.scalars().first(), ">="),
            FilterOperation::Lte => self.bound(c, x, c.value.scalars().first(), "<="),
            FilterOperation::Between => {
                let bounds = c.value.scalars();
                let lo = self.bound(c, x, bounds.first(), ">=");
                let hi = self.bound(c, x, bounds.get(1), "<=");
                format!("({} AND {})", lo, hi)
            }
            FilterOperation::In => {
                let p = self.bind_value(c.origin, &c.value);
                if list {
                    format!("ANY(v IN {} WHERE v IN {})", x, p)
                } else {
                    format!("{} IN {}", x, p)
                }
            }
            FilterOperation::IsEmpty => empty_check(x, c.value_type),
        }
    }
}

fn empty_check(x: &str, value_type: ValueType) -> String {
    match value_type {
        ValueType::String | ValueType::StringList | ValueType::Date => {
            format!("({} IS NULL OR size({}) = 0)", x, x)
        }
        _ => format!("{} IS NULL", x),
    }
}
