//! JSON wire form of predicate trees.
//!
//! ```text
//! {"AND": [ {"filter": {"property": "CONTACTS_REGION", "value": ["NY"],
//!                       "operation": "IN", "includeEmpty": false}},
//!           {"OR": [ ... ]} ]}
//! ```
//!
//! `operation` defaults to `EQ` and `includeEmpty` to `false` when absent.
//! Older persisted filters wrap EQ operands in a one-element array; those are
//! unwrapped on decode so scalar operations always carry a scalar.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::errors::WireError;
use super::{Combinator, Condition, FilterOperation, FilterValue, Predicate, Scalar};
use crate::catalog::ColumnType;

const FILTER_KEY: &str = "filter";

impl Predicate {
    pub fn from_wire_str(json: &str) -> Result<Self, WireError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| WireError::Malformed(e.to_string()))?;
        Predicate::from_wire(&value)
    }

    pub fn from_wire(value: &Value) -> Result<Self, WireError> {
        let object = value
            .as_object()
            .ok_or_else(|| WireError::UnexpectedNode(value.to_string()))?;
        if object.len() != 1 {
            return Err(WireError::UnexpectedNode(value.to_string()));
        }
        let (key, body) = match object.iter().next() {
            Some(entry) => entry,
            None => return Err(WireError::UnexpectedNode(value.to_string())),
        };

        if key == FILTER_KEY {
            return decode_condition(body).map(Predicate::Leaf);
        }

        let combinator: Combinator = key
            .parse()
            .map_err(|_| WireError::UnexpectedNode(value.to_string()))?;
        let items = body
            .as_array()
            .ok_or_else(|| WireError::UnexpectedNode(body.to_string()))?;
        let children = items
            .iter()
            .map(Predicate::from_wire)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Predicate::Group {
            combinator,
            children,
        })
    }

    pub fn to_wire(&self) -> Value {
        let mut node = Map::new();
        match self {
            Predicate::Group {
                combinator,
                children,
            } => {
                node.insert(
                    combinator.as_str().to_string(),
                    Value::Array(children.iter().map(Predicate::to_wire).collect()),
                );
            }
            Predicate::Leaf(condition) => {
                node.insert(FILTER_KEY.to_string(), encode_condition(condition));
            }
        }
        Value::Object(node)
    }

    pub fn to_wire_string(&self) -> String {
        self.to_wire().to_string()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCondition {
    property: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    operation: Option<String>,
    #[serde(default)]
    include_empty: bool,
}

fn decode_condition(body: &Value) -> Result<Condition, WireError> {
    let raw = WireCondition::deserialize(body).map_err(|e| WireError::Malformed(e.to_string()))?;
    let property: ColumnType = raw
        .property
        .parse()
        .map_err(|_| WireError::UnknownProperty(raw.property.clone()))?;
    let operation = match raw.operation.as_deref() {
        None => FilterOperation::Eq,
        Some(op) => op
            .parse()
            .map_err(|_| WireError::UnknownOperation(op.to_string()))?,
    };
    let mut value = decode_value(&raw.property, &raw.value)?;

    if is_scalar_operation(operation) {
        if let FilterValue::List(items) = &mut value {
            if items.len() == 1 {
                log::debug!("Unwrapping one-element {} operand for {}", operation, property);
                value = FilterValue::Scalar(items.remove(0));
            }
        }
    }

    Ok(Condition {
        property,
        operation,
        value,
        include_empty: raw.include_empty,
    })
}

fn is_scalar_operation(operation: FilterOperation) -> bool {
    !matches!(
        operation,
        FilterOperation::In | FilterOperation::Between | FilterOperation::IsEmpty
    )
}

fn decode_value(property: &str, value: &Value) -> Result<FilterValue, WireError> {
    match value {
        Value::Null => Ok(FilterValue::None),
        Value::Array(items) => items
            .iter()
            .map(|item| decode_scalar(property, item))
            .collect::<Result<Vec<_>, _>>()
            .map(FilterValue::List),
        other => decode_scalar(property, other).map(FilterValue::Scalar),
    }
}

fn decode_scalar(property: &str, value: &Value) -> Result<Scalar, WireError> {
    match value {
        Value::String(s) => Ok(Scalar::Str(s.clone())),
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Scalar::Int(i))
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite()) {
                Ok(Scalar::Float(f))
            } else {
                Err(unsupported(property, value))
            }
        }
        _ => Err(unsupported(property, value)),
    }
}

fn unsupported(property: &str, value: &Value) -> WireError {
    WireError::UnsupportedValue {
        property: property.to_string(),
        value: value.to_string(),
    }
}

fn encode_condition(condition: &Condition) -> Value {
    let mut body = Map::new();
    body.insert(
        "property".to_string(),
        Value::String(condition.property.as_str().to_string()),
    );
    match &condition.value {
        FilterValue::None => {}
        FilterValue::Scalar(s) => {
            body.insert("value".to_string(), encode_scalar(s));
        }
        FilterValue::List(items) => {
            body.insert(
                "value".to_string(),
                Value::Array(items.iter().map(encode_scalar).collect()),
            );
        }
    }
    body.insert(
        "operation".to_string(),
        Value::String(condition.operation.as_str().to_string()),
    );
    body.insert("includeEmpty".to_string(), Value::Bool(condition.include_empty));
    Value::Object(body)
}

pub(crate) fn encode_scalar(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Str(s) => Value::String(s.clone()),
        Scalar::Int(i) => Value::Number((*i).into()),
        Scalar::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Scalar::Bool(b) => Value::Bool(*b),
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Predicate::from_wire(&value).map_err(serde::de::Error::custom)
    }
}
