//! Declared parameter kinds, locations, styles and combined-schema keywords.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{ParameterError, Result};

/// Declared value kind of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    /// Declarations without a resolvable type; compliant with no value
    Unknown,
}

impl ParameterType {
    /// Resolve the `type` string of a raw declaration
    pub fn from_spec_str(s: &str) -> Self {
        match s {
            "string" => ParameterType::String,
            "number" => ParameterType::Number,
            "integer" => ParameterType::Integer,
            "boolean" => ParameterType::Boolean,
            "object" => ParameterType::Object,
            "array" => ParameterType::Array,
            "null" => ParameterType::Null,
            other => {
                tracing::warn!("unsupported parameter type '{other}'");
                ParameterType::Unknown
            }
        }
    }

    /// True for the kinds carried by leaf parameters
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            ParameterType::Object | ParameterType::Array
        )
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Integer => "integer",
            ParameterType::Boolean => "boolean",
            ParameterType::Object => "object",
            ParameterType::Array => "array",
            ParameterType::Null => "null",
            ParameterType::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Position of the parameter within the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// Request/response body declarations, which carry no `in` field
    Body,
}

impl ParameterLocation {
    /// Resolve the `in` field of a raw declaration. A missing field means a
    /// body declaration; an unrecognized one is a fatal creation error.
    pub fn from_spec(value: Option<&JsonValue>) -> Result<Self> {
        match value.and_then(JsonValue::as_str) {
            None => Ok(ParameterLocation::Body),
            Some("path") => Ok(ParameterLocation::Path),
            Some("query") => Ok(ParameterLocation::Query),
            Some("header") => Ok(ParameterLocation::Header),
            Some("cookie") => Ok(ParameterLocation::Cookie),
            Some(other) => Err(ParameterError::creation(format!(
                "unresolvable parameter location '{other}'"
            ))),
        }
    }

    /// Style applied by the OpenAPI standard when the declaration has none
    pub fn default_style(&self) -> ParameterStyle {
        match self {
            ParameterLocation::Path | ParameterLocation::Header => ParameterStyle::Simple,
            ParameterLocation::Query | ParameterLocation::Cookie | ParameterLocation::Body => {
                ParameterStyle::Form
            }
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Body => "body",
        };
        write!(f, "{name}")
    }
}

/// OpenAPI serialization style of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    Form,
    Simple,
    Matrix,
    Label,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

impl ParameterStyle {
    /// Resolve the `style` field of a raw declaration; unrecognized styles
    /// fall back to the location default with a warning
    pub fn from_spec(value: Option<&JsonValue>) -> Option<Self> {
        match value.and_then(JsonValue::as_str) {
            None => None,
            Some("form") => Some(ParameterStyle::Form),
            Some("simple") => Some(ParameterStyle::Simple),
            Some("matrix") => Some(ParameterStyle::Matrix),
            Some("label") => Some(ParameterStyle::Label),
            Some("spaceDelimited") => Some(ParameterStyle::SpaceDelimited),
            Some("pipeDelimited") => Some(ParameterStyle::PipeDelimited),
            Some("deepObject") => Some(ParameterStyle::DeepObject),
            Some(other) => {
                tracing::warn!("unsupported parameter style '{other}'; using the location default");
                None
            }
        }
    }
}

impl fmt::Display for ParameterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterStyle::Form => "form",
            ParameterStyle::Simple => "simple",
            ParameterStyle::Matrix => "matrix",
            ParameterStyle::Label => "label",
            ParameterStyle::SpaceDelimited => "spaceDelimited",
            ParameterStyle::PipeDelimited => "pipeDelimited",
            ParameterStyle::DeepObject => "deepObject",
        };
        write!(f, "{name}")
    }
}

/// Combined-schema keywords of the OpenAPI schema object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombinedKind {
    OneOf,
    AnyOf,
    AllOf,
}

impl CombinedKind {
    pub fn all() -> &'static [CombinedKind] {
        &[CombinedKind::OneOf, CombinedKind::AnyOf, CombinedKind::AllOf]
    }

    /// The schema-object key carrying the candidate list
    pub fn spec_key(&self) -> &'static str {
        match self {
            CombinedKind::OneOf => "oneOf",
            CombinedKind::AnyOf => "anyOf",
            CombinedKind::AllOf => "allOf",
        }
    }

    /// Detect which combined keyword, if any, a schema map declares
    pub fn detect(source: &serde_json::Map<String, JsonValue>) -> Option<Self> {
        CombinedKind::all()
            .iter()
            .copied()
            .find(|kind| source.contains_key(kind.spec_key()))
    }
}

impl fmt::Display for CombinedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec_key())
    }
}
