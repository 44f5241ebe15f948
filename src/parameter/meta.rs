//! Shared identity, constraints and value sets of every parameter variant,
//! and their construction from a raw declaration map.

use indexmap::IndexSet;
use serde_json::{Map, Value as JsonValue};

use crate::error::{ParameterError, Result};
use crate::operation::OperationHandle;
use crate::parameter::name::{NormalizedName, ParameterName, ParentPath};
use crate::parameter::types::{ParameterLocation, ParameterStyle, ParameterType};
use crate::value::ParameterValue;
use crate::value::compliance;

/// View of the raw declaration that type/format/default/enum are read from:
/// the nested `schema` map for parameters, the declaration itself for
/// body/response declarations.
pub(crate) fn schema_source(map: &Map<String, JsonValue>) -> &Map<String, JsonValue> {
    map.get("schema")
        .and_then(JsonValue::as_object)
        .unwrap_or(map)
}

/// Resolve the declared kind, inferring structure when `type` is absent
pub(crate) fn resolve_kind(source: &Map<String, JsonValue>) -> ParameterType {
    match source.get("type").and_then(JsonValue::as_str) {
        Some(s) => ParameterType::from_spec_str(s),
        None if source.contains_key("properties") => ParameterType::Object,
        None if source.contains_key("items") => ParameterType::Array,
        None => ParameterType::Unknown,
    }
}

/// Fields shared by every parameter variant.
///
/// A parameter is bound permanently to one operation and at most one parent;
/// both links are non-owning. Every mutation outside construction is gated on
/// the operation's read-only flag through [`ParameterMeta::ensure_mutable`].
#[derive(Debug, Clone)]
pub(crate) struct ParameterMeta {
    pub(crate) name: ParameterName,
    pub(crate) normalized_name: NormalizedName,
    pub(crate) schema_name: Option<String>,
    pub(crate) required: bool,
    pub(crate) kind: ParameterType,
    pub(crate) format: Option<String>,
    pub(crate) location: ParameterLocation,
    pub(crate) style: ParameterStyle,
    pub(crate) explode: bool,
    pub(crate) default_value: Option<ParameterValue>,
    pub(crate) enum_values: IndexSet<ParameterValue>,
    pub(crate) examples: IndexSet<ParameterValue>,
    pub(crate) operation: OperationHandle,
    pub(crate) parent: Option<ParentPath>,
}

impl ParameterMeta {
    pub(crate) fn from_raw(
        parent: Option<ParentPath>,
        raw: &JsonValue,
        operation: &OperationHandle,
        explicit_name: Option<&str>,
    ) -> Result<Self> {
        let map = raw.as_object().ok_or_else(|| {
            ParameterError::creation("parameter declaration must be a JSON object")
        })?;

        let name = match explicit_name {
            Some(name) => ParameterName::new(name),
            None => map
                .get("name")
                .and_then(JsonValue::as_str)
                .map(ParameterName::new)
                .ok_or_else(|| {
                    ParameterError::creation(format!(
                        "missing name for parameter in operation '{operation}'"
                    ))
                })?,
        };

        let source = schema_source(map);
        let schema_name = source
            .get("x-schemaName")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        // On object schemas `required` is a list of property names, handled by
        // the object variant; only the boolean form applies here.
        let required = map
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);

        let location = ParameterLocation::from_spec(map.get("in"))?;
        let style =
            ParameterStyle::from_spec(map.get("style")).unwrap_or_else(|| location.default_style());
        let explode = map
            .get("explode")
            .and_then(JsonValue::as_bool)
            .unwrap_or(style == ParameterStyle::Form);

        let kind = resolve_kind(source);
        let format = source
            .get("format")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        let normalized_name =
            NormalizedName::compute(&name, schema_name.as_deref(), parent.as_ref());

        let mut meta = Self {
            name,
            normalized_name,
            schema_name,
            required,
            kind,
            format,
            location,
            style,
            explode,
            default_value: None,
            enum_values: IndexSet::new(),
            examples: IndexSet::new(),
            operation: operation.clone(),
            parent,
        };

        meta.ingest_default(source);
        meta.ingest_enum_values(source);
        meta.ingest_examples(map);

        Ok(meta)
    }

    fn ingest_default(&mut self, source: &Map<String, JsonValue>) {
        if let Some(raw) = source.get("default") {
            let value = ParameterValue::from(raw);
            self.default_value = compliance::ingest(&value, self.kind, "default");
        }
    }

    fn ingest_enum_values(&mut self, source: &Map<String, JsonValue>) {
        let Some(values) = source.get("enum").and_then(JsonValue::as_array) else {
            return;
        };
        for raw in values {
            let value = ParameterValue::from(raw);
            if let Some(stored) = compliance::ingest(&value, self.kind, "enum") {
                self.enum_values.insert(stored);
            }
        }
    }

    /// Merge the singular `example` field and the keyed `examples` map.
    ///
    /// The two should be mutually exclusive per the standard, but the input is
    /// treated leniently, pursuing fault tolerance over strictness.
    fn ingest_examples(&mut self, map: &Map<String, JsonValue>) {
        if let Some(raw) = map.get("example") {
            self.add_example_value(&ParameterValue::from(raw));
        }

        let Some(entries) = map.get("examples").and_then(JsonValue::as_object) else {
            return;
        };
        for (key, entry) in entries {
            if let Some(raw) = entry.get("value") {
                self.add_example_value(&ParameterValue::from(raw));
            } else if entry.get("externalValue").is_some() {
                tracing::warn!("example '{key}' uses an external value, which is not supported");
            }
        }
    }

    /// Unguarded example ingestion, used during construction and example
    /// distribution. Returns whether a value was stored.
    pub(crate) fn add_example_value(&mut self, value: &ParameterValue) -> bool {
        match compliance::ingest(value, self.kind, "example") {
            Some(stored) => {
                self.examples.insert(stored);
                true
            }
            None => false,
        }
    }

    /// Refuse mutation of parameters owned by a read-only operation
    pub(crate) fn ensure_mutable(&self) -> Result<()> {
        if self.operation.is_read_only() {
            return Err(ParameterError::EditReadOnlyOperation {
                operation: self.operation.to_string(),
            });
        }
        Ok(())
    }

    /// Parent path for the children of the element owning this meta
    pub(crate) fn child_path(&self) -> ParentPath {
        match &self.parent {
            Some(path) => path.child(&self.name),
            None => ParentPath::root(&self.name),
        }
    }

    /// Rebind the operation and parent links, as part of a deep clone
    pub(crate) fn rebind(&mut self, operation: &OperationHandle, parent: Option<ParentPath>) {
        self.operation = operation.clone();
        self.parent = parent;
    }

    /// Equality over the identity fields shared by all variants.
    ///
    /// Normalized names take part only when both sides have a parent; near
    /// tree roots the comparison is deliberately relaxed to avoid
    /// over-matching.
    pub(crate) fn agrees_with(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.location == other.location
            && self.operation == other.operation
            && (self.parent.is_none()
                || other.parent.is_none()
                || self.normalized_name == other.normalized_name)
    }

    /// Hash over the fields used by equality, never over mutable containers
    pub(crate) fn hash_identity<H: std::hash::Hasher>(&self, state: &mut H) {
        use std::hash::Hash;
        self.name.hash(state);
        self.kind.hash(state);
        self.location.hash(state);
        self.operation.hash(state);
    }

    /// Shared part of `merge`: union the value sets, prefer the caller's
    /// default, keep the caller's metadata
    pub(crate) fn merged_with(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged
            .enum_values
            .extend(other.enum_values.iter().cloned());
        merged.examples.extend(other.examples.iter().cloned());
        if merged.default_value.is_none() {
            merged.default_value = other.default_value.clone();
        }
        merged
    }
}
