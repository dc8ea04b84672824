//! In-process property graph that evaluates plans directly.
//!
//! Evaluation works on the resolved plan, not the Cypher text, and follows
//! the same semantics: traversal leaves are existential, null / `""` / `[]`
//! count as missing, string matching for CONTAINS and STARTS_WITH ignores
//! case, missing sort keys go last, and ties are broken by id ascending.
//! Count and data are computed under one read guard, so they always agree.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::{EntityRow, GraphExecutor, RawPage};
use crate::catalog::{Direction, GraphPath, Hop, ValueType};
use crate::predicate::validate::{compare_date_bound, date_instant};
use crate::predicate::{Combinator, FilterOperation, Scalar};
use crate::query::{ExecutablePlan, ResolvedCondition, ResolvedPredicate, ResolvedSort};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRelationship {
    pub from: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub to: String,
}

/// Serialised graph contents, as loaded from YAML or JSON.
///
/// ```yaml
/// nodes:
///   - id: t1
///     labels: [Tenant]
///     properties: { name: acme }
///   - id: o1
///     labels: [Organization]
///     properties: { name: Acme Corp, hide: false }
/// relationships:
///   - { from: o1, type: ORGANIZATION_BELONGS_TO_TENANT, to: t1 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFixture {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub relationships: Vec<GraphRelationship>,
}

impl GraphFixture {
    /// Parses YAML; JSON input is accepted as well.
    pub fn from_yaml_str(content: &str) -> Result<Self, StoreError> {
        serde_yaml::from_str(content)
            .map_err(|e| StoreError::Corrupt(format!("invalid graph fixture: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read fixture {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }
}

#[derive(Debug, Default)]
struct GraphData {
    nodes: BTreeMap<String, GraphNode>,
    outgoing: HashMap<String, Vec<(String, String)>>,
    incoming: HashMap<String, Vec<(String, String)>>,
}

#[derive(Debug, Default)]
pub struct InMemoryGraph {
    data: RwLock<GraphData>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: GraphFixture) -> Result<Self, StoreError> {
        let mut data = GraphData::default();
        for node in fixture.nodes {
            data.insert_node(node)?;
        }
        for rel in fixture.relationships {
            data.relate(&rel.from, &rel.rel_type, &rel.to)?;
        }
        log::info!("Loaded in-memory graph with {} nodes", data.nodes.len());
        Ok(InMemoryGraph {
            data: RwLock::new(data),
        })
    }

    /// Inserts or replaces a node. `properties` must be a JSON object.
    pub async fn insert_node(
        &self,
        id: &str,
        labels: &[&str],
        properties: Value,
    ) -> Result<(), StoreError> {
        let properties = match properties {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(StoreError::Corrupt(format!(
                    "node {} properties must be an object, got {}",
                    id, other
                )))
            }
        };
        self.data.write().await.insert_node(GraphNode {
            id: id.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties,
        })
    }

    pub async fn relate(&self, from: &str, rel_type: &str, to: &str) -> Result<(), StoreError> {
        self.data.write().await.relate(from, rel_type, to)
    }

    pub async fn set_property(&self, id: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        let node = data
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::Corrupt(format!("no node {}", id)))?;
        node.properties.insert(key.to_string(), value);
        Ok(())
    }

    pub async fn remove_node(&self, id: &str) -> bool {
        let mut guard = self.data.write().await;
        let data = &mut *guard;
        let removed = data.nodes.remove(id).is_some();
        data.outgoing.remove(id);
        data.incoming.remove(id);
        for edges in data.outgoing.values_mut().chain(data.incoming.values_mut()) {
            edges.retain(|(_, other)| other != id);
        }
        removed
    }

    pub async fn node_count(&self) -> usize {
        self.data.read().await.nodes.len()
    }
}

impl GraphData {
    /// The node id is also readable as the `id` property.
    fn insert_node(&mut self, mut node: GraphNode) -> Result<(), StoreError> {
        if node.id.is_empty() {
            return Err(StoreError::Corrupt("node without id".to_string()));
        }
        node.properties
            .entry("id")
            .or_insert_with(|| Value::String(node.id.clone()));
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    fn relate(&mut self, from: &str, rel_type: &str, to: &str) -> Result<(), StoreError> {
        for end in [from, to] {
            if !self.nodes.contains_key(end) {
                return Err(StoreError::Corrupt(format!(
                    "relationship {} references unknown node {}",
                    rel_type, end
                )));
            }
        }
        self.outgoing
            .entry(from.to_string())
            .or_default()
            .push((rel_type.to_string(), to.to_string()));
        self.incoming
            .entry(to.to_string())
            .or_default()
            .push((rel_type.to_string(), from.to_string()));
        Ok(())
    }

    fn step<'a>(&'a self, from: &GraphNode, hop: &Hop) -> Vec<&'a GraphNode> {
        let edges = match hop.direction {
            Direction::Outgoing => self.outgoing.get(&from.id),
            Direction::Incoming => self.incoming.get(&from.id),
        };
        edges
            .into_iter()
            .flatten()
            .filter(|(rel, _)| rel == hop.relationship)
            .filter_map(|(_, other)| self.nodes.get(other))
            .filter(|n| n.labels.iter().any(|l| l == hop.label))
            .collect()
    }

    /// Nodes at the end of `path`, each reported once.
    fn reach<'a>(&'a self, root: &'a GraphNode, path: &GraphPath) -> Vec<&'a GraphNode> {
        let mut frontier = vec![root];
        for hop in path.hops {
            let mut seen: HashSet<String> = HashSet::new();
            frontier = frontier
                .into_iter()
                .flat_map(|node| self.step(node, hop))
                .filter(|n| seen.insert(n.id.clone()))
                .collect();
        }
        frontier
    }

    /// Non-empty values at `path`; list properties are flattened.
    fn values<'a>(&'a self, root: &'a GraphNode, path: &GraphPath) -> Vec<&'a Value> {
        let mut out = Vec::new();
        for node in self.reach(root, path) {
            match node.properties.get(path.property) {
                Some(Value::Array(items)) => out.extend(items.iter().filter(|v| !is_empty_value(v))),
                Some(value) if !is_empty_value(value) => out.push(value),
                _ => {}
            }
        }
        out
    }

    fn evaluate(&self, node: &GraphNode, predicate: &ResolvedPredicate) -> bool {
        match predicate {
            ResolvedPredicate::Leaf(condition) => self.holds(node, condition),
            ResolvedPredicate::Group { children, .. } if children.is_empty() => true,
            ResolvedPredicate::Group {
                combinator: Combinator::And,
                children,
            } => children.iter().all(|c| self.evaluate(node, c)),
            ResolvedPredicate::Group {
                combinator: Combinator::Or,
                children,
            } => children.iter().any(|c| self.evaluate(node, c)),
        }
    }

    fn holds(&self, node: &GraphNode, c: &ResolvedCondition) -> bool {
        let values = self.values(node, &c.path);
        if c.operation == FilterOperation::IsEmpty {
            return values.is_empty();
        }
        if values.is_empty() {
            return c.include_empty;
        }
        let operand = c.value.scalars();
        let date = c.value_type == ValueType::Date;
        match c.operation {
            FilterOperation::Eq => values.iter().any(|v| operand.iter().any(|s| scalar_eq(v, s))),
            FilterOperation::Neq => !values.iter().any(|v| operand.iter().any(|s| scalar_eq(v, s))),
            FilterOperation::In => values.iter().any(|v| operand.iter().any(|s| scalar_eq(v, s))),
            FilterOperation::Contains => text_match(&values, operand, |h, n| h.contains(n)),
            FilterOperation::StartsWith => text_match(&values, operand, |h, n| h.starts_with(n)),
            FilterOperation::Gte => values.iter().any(|v| {
                operand
                    .first()
                    .and_then(|s| compare_scalar(v, s, date))
                    .is_some_and(|o| o != Ordering::Less)
            }),
            FilterOperation::Lte => values.iter().any(|v| {
                operand
                    .first()
                    .and_then(|s| compare_scalar(v, s, date))
                    .is_some_and(|o| o != Ordering::Greater)
            }),
            FilterOperation::Between => match operand {
                [lo, hi] => values.iter().any(|v| {
                    compare_scalar(v, lo, date).is_some_and(|o| o != Ordering::Less)
                        && compare_scalar(v, hi, date).is_some_and(|o| o != Ordering::Greater)
                }),
                _ => false,
            },
            FilterOperation::IsEmpty => false,
        }
    }

    /// Min value for ascending keys, max for descending; `None` when missing.
    fn sort_key<'a>(&'a self, node: &'a GraphNode, key: &ResolvedSort) -> Option<&'a Value> {
        let date = key.value_type == ValueType::Date;
        let values = self.values(node, &key.path).into_iter();
        if key.descending {
            values.max_by(|a, b| compare_values(a, b, date))
        } else {
            values.min_by(|a, b| compare_values(a, b, date))
        }
    }

    fn run(&self, plan: &ExecutablePlan) -> RawPage {
        let matched: Vec<&GraphNode> = self
            .nodes
            .values()
            .filter(|n| n.labels.iter().any(|l| l == plan.root_label))
            .filter(|n| self.evaluate(n, &plan.predicate))
            .collect();
        let total = matched.len() as u64;

        let mut keyed: Vec<(Vec<Option<&Value>>, &GraphNode)> = matched
            .into_iter()
            .map(|n| (plan.sort.iter().map(|k| self.sort_key(n, k)).collect(), n))
            .collect();
        keyed.sort_by(|(ka, a), (kb, b)| {
            for (i, key) in plan.sort.iter().enumerate() {
                let date = key.value_type == ValueType::Date;
                let ord = match (ka[i], kb[i]) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(x), Some(y)) if key.descending => compare_values(y, x, date),
                    (Some(x), Some(y)) => compare_values(x, y, date),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.id.cmp(&b.id)
        });

        let skip = usize::try_from(plan.window.skip).unwrap_or(usize::MAX);
        let take = plan
            .window
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        let rows = keyed
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(_, n)| EntityRow {
                id: n.id.clone(),
                labels: n.labels.clone(),
                properties: n.properties.clone(),
            })
            .collect();
        RawPage { rows, total }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn scalar_eq(value: &Value, scalar: &Scalar) -> bool {
    match (value, scalar) {
        (Value::String(a), Scalar::Str(b)) => a == b,
        (Value::Bool(a), Scalar::Bool(b)) => a == b,
        (Value::Number(n), Scalar::Int(i)) => n.as_f64() == Some(*i as f64),
        (Value::Number(n), Scalar::Float(f)) => n.as_f64() == Some(*f),
        _ => false,
    }
}

fn text_match(values: &[&Value], operand: &[Scalar], test: impl Fn(&str, &str) -> bool) -> bool {
    let needles: Vec<String> = operand
        .iter()
        .filter_map(Scalar::as_str)
        .map(str::to_lowercase)
        .collect();
    values.iter().any(|v| match v {
        Value::String(s) => {
            let haystack = s.to_lowercase();
            needles.iter().any(|n| test(&haystack, n))
        }
        _ => false,
    })
}

fn compare_scalar(value: &Value, scalar: &Scalar, date: bool) -> Option<Ordering> {
    match (value, scalar) {
        (Value::Number(n), Scalar::Int(i)) => n.as_f64()?.partial_cmp(&(*i as f64)),
        (Value::Number(n), Scalar::Float(f)) => n.as_f64()?.partial_cmp(f),
        (Value::String(a), Scalar::Str(b)) if date => compare_date_bound(a, b),
        (Value::String(a), Scalar::Str(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}

/// Dates order by instant; unparseable dates go after every parseable one.
fn compare_text(a: &str, b: &str, date: bool) -> Ordering {
    if !date {
        return a.cmp(b);
    }
    match (date_instant(a), date_instant(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn compare_values(a: &Value, b: &Value, date: bool) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => compare_text(x, y, date),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        _ => 3,
    }
}

#[async_trait]
impl GraphExecutor for InMemoryGraph {
    async fn execute(&self, plan: &ExecutablePlan) -> Result<RawPage, StoreError> {
        let data = self.data.read().await;
        Ok(data.run(plan))
    }

    async fn count(&self, plan: &ExecutablePlan) -> Result<u64, StoreError> {
        let data = self.data.read().await;
        let total = data
            .nodes
            .values()
            .filter(|n| n.labels.iter().any(|l| l == plan.root_label))
            .filter(|n| data.evaluate(n, &plan.predicate))
            .count();
        Ok(total as u64)
    }
}
