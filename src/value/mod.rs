//! Runtime representation of parameter values.
//!
//! Values arrive from the external specification parser as loosely-typed JSON
//! data. They are modeled here as a small tagged union so that type compliance
//! becomes a match over a closed set instead of runtime type inspection, and
//! so that values can live inside hashed sets (enum values, examples):
//! equality and hashing of the mapping variant are independent of key order.

pub mod compliance;

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde_json::Value as JsonValue;

/// A numeric value, kept as declared: integers and floats never compare equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    Int(i64),
    Float(OrderedFloat<f64>),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => f.into_inner(),
        }
    }

    /// True for integers and for floats without a fractional part
    pub fn is_integral(&self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(f) => f.into_inner().fract() == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Tagged union over every value shape a parameter can carry.
///
/// Absence is expressed with `Option<ParameterValue>` at the use sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ParameterValue>),
    Object(IndexMap<String, ParameterValue>),
}

impl ParameterValue {
    /// Name of the value's runtime kind, used in warning messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParameterValue::Null => "null",
            ParameterValue::Bool(_) => "boolean",
            ParameterValue::Number(_) => "number",
            ParameterValue::String(_) => "string",
            ParameterValue::Array(_) => "array",
            ParameterValue::Object(_) => "object",
        }
    }

    /// Convert back to a JSON value, e.g. for request-body serialization
    pub fn to_json(&self) -> JsonValue {
        match self {
            ParameterValue::Null => JsonValue::Null,
            ParameterValue::Bool(b) => JsonValue::Bool(*b),
            ParameterValue::Number(Number::Int(i)) => JsonValue::from(*i),
            ParameterValue::Number(Number::Float(f)) => JsonValue::from(f.into_inner()),
            ParameterValue::String(s) => JsonValue::String(s.clone()),
            ParameterValue::Array(items) => {
                JsonValue::Array(items.iter().map(ParameterValue::to_json).collect())
            }
            ParameterValue::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&JsonValue> for ParameterValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => ParameterValue::Null,
            JsonValue::Bool(b) => ParameterValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => ParameterValue::Number(Number::Int(i)),
                // Large u64 and fractional values both land here
                None => ParameterValue::Number(Number::Float(OrderedFloat(
                    n.as_f64().unwrap_or(f64::NAN),
                ))),
            },
            JsonValue::String(s) => ParameterValue::String(s.clone()),
            JsonValue::Array(items) => {
                ParameterValue::Array(items.iter().map(ParameterValue::from).collect())
            }
            JsonValue::Object(map) => ParameterValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), ParameterValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for ParameterValue {
    fn from(value: JsonValue) -> Self {
        ParameterValue::from(&value)
    }
}

impl Hash for ParameterValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ParameterValue::Null => state.write_u8(0),
            ParameterValue::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            ParameterValue::Number(n) => {
                state.write_u8(2);
                n.hash(state);
            }
            ParameterValue::String(s) => {
                state.write_u8(3);
                s.hash(state);
            }
            ParameterValue::Array(items) => {
                state.write_u8(4);
                state.write_usize(items.len());
                for item in items {
                    item.hash(state);
                }
            }
            ParameterValue::Object(map) => {
                // Key order is declaration order, which must not influence the
                // hash: combine per-entry hashes commutatively.
                state.write_u8(5);
                state.write_usize(map.len());
                let mut combined: u64 = 0;
                for (key, value) in map {
                    let mut entry = DefaultHasher::new();
                    key.hash(&mut entry);
                    value.hash(&mut entry);
                    combined ^= entry.finish();
                }
                state.write_u64(combined);
            }
        }
    }
}

impl fmt::Display for ParameterValue {
    /// Plain wire rendering of the value: scalars as bare text, sequences and
    /// mappings flattened with commas (the non-exploded SIMPLE shape)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Null => write!(f, "null"),
            ParameterValue::Bool(b) => write!(f, "{b}"),
            ParameterValue::Number(n) => write!(f, "{n}"),
            ParameterValue::String(s) => write!(f, "{s}"),
            ParameterValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
            ParameterValue::Object(map) => {
                let parts: Vec<String> =
                    map.iter().flat_map(|(k, v)| [k.clone(), v.to_string()]).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}
