//! The polymorphic tree of parameter elements.
//!
//! A parameter is one of a closed set of variants (scalar leaves, objects,
//! arrays and combined schemas) sharing a common contract: construction from
//! a raw declaration map, structural equality, identity hashing, deep
//! cloning, merging and recursive traversal. Behavior that differs per
//! variant is matched exhaustively over [`ParameterElement`].
//!
//! Parameters parsed from a specification belong to a read-only operation and
//! act as immutable templates; every mutator refuses to touch them. Deep
//! cloning into a mutable operation handle is the only template-to-working
//! transition.

pub mod array;
pub mod combined;
pub mod leaf;
pub(crate) mod meta;
pub mod name;
pub mod object;
pub mod types;

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde_json::Value as JsonValue;

use crate::error::{ParameterError, Result};
use crate::operation::OperationHandle;
use crate::value::ParameterValue;

pub use array::ArrayParameter;
pub use combined::CombinedParameter;
pub use leaf::LeafParameter;
pub use name::{NormalizedName, ParameterName, ParentPath};
pub use object::ObjectParameter;
pub use types::{CombinedKind, ParameterLocation, ParameterStyle, ParameterType};

use meta::{ParameterMeta, resolve_kind, schema_source};

/// A node of the parameter tree
#[derive(Debug, Clone)]
pub enum ParameterElement {
    Leaf(LeafParameter),
    Object(ObjectParameter),
    Array(ArrayParameter),
    Combined(CombinedParameter),
}

impl ParameterElement {
    /// Build a top-level parameter from a raw declaration map.
    ///
    /// The variant is picked from the declared type, falling back to
    /// structural inference (`properties`, `items`, combined keywords) when
    /// the type is absent. Fails when the declaration carries no name and
    /// none is supplied, or when its location cannot be resolved.
    pub fn from_raw(
        raw: &JsonValue,
        operation: &OperationHandle,
        explicit_name: Option<&str>,
    ) -> Result<Self> {
        Self::from_raw_with_parent(None, raw, operation, explicit_name)
    }

    /// Build a parameter bound to an enclosing element's identity path.
    ///
    /// Composite variants use this for their children; it is also the entry
    /// point for callers re-creating a nested declaration in place.
    pub fn from_raw_with_parent(
        parent: Option<ParentPath>,
        raw: &JsonValue,
        operation: &OperationHandle,
        explicit_name: Option<&str>,
    ) -> Result<Self> {
        let map = raw.as_object().ok_or_else(|| {
            ParameterError::creation("parameter declaration must be a JSON object")
        })?;
        let source = schema_source(map);

        if CombinedKind::detect(source).is_some() {
            return CombinedParameter::from_raw_with_parent(parent, raw, operation, explicit_name)
                .map(Self::Combined);
        }

        match resolve_kind(source) {
            ParameterType::Object => {
                ObjectParameter::from_raw_with_parent(parent, raw, operation, explicit_name)
                    .map(Self::Object)
            }
            ParameterType::Array => {
                ArrayParameter::from_raw_with_parent(parent, raw, operation, explicit_name)
                    .map(Self::Array)
            }
            _ => LeafParameter::from_raw_with_parent(parent, raw, operation, explicit_name)
                .map(Self::Leaf),
        }
    }

    pub(crate) fn meta(&self) -> &ParameterMeta {
        match self {
            ParameterElement::Leaf(leaf) => &leaf.meta,
            ParameterElement::Object(object) => &object.meta,
            ParameterElement::Array(array) => &array.meta,
            ParameterElement::Combined(combined) => &combined.meta,
        }
    }

    pub(crate) fn meta_mut(&mut self) -> &mut ParameterMeta {
        match self {
            ParameterElement::Leaf(leaf) => &mut leaf.meta,
            ParameterElement::Object(object) => &mut object.meta,
            ParameterElement::Array(array) => &mut array.meta,
            ParameterElement::Combined(combined) => &mut combined.meta,
        }
    }

    // Shared read access

    pub fn name(&self) -> &ParameterName {
        &self.meta().name
    }

    pub fn normalized_name(&self) -> &NormalizedName {
        &self.meta().normalized_name
    }

    /// Name of the originating schema, when the declaration referenced one
    pub fn schema_name(&self) -> Option<&str> {
        self.meta().schema_name.as_deref()
    }

    pub fn required(&self) -> bool {
        self.meta().required
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.meta().kind
    }

    pub fn format(&self) -> Option<&str> {
        self.meta().format.as_deref()
    }

    pub fn location(&self) -> ParameterLocation {
        self.meta().location
    }

    pub fn style(&self) -> ParameterStyle {
        self.meta().style
    }

    pub fn explode(&self) -> bool {
        self.meta().explode
    }

    pub fn default_value(&self) -> Option<&ParameterValue> {
        self.meta().default_value.as_ref()
    }

    pub fn enum_values(&self) -> &IndexSet<ParameterValue> {
        &self.meta().enum_values
    }

    pub fn examples(&self) -> &IndexSet<ParameterValue> {
        &self.meta().examples
    }

    pub fn is_enum(&self) -> bool {
        !self.meta().enum_values.is_empty()
    }

    pub fn operation(&self) -> &OperationHandle {
        &self.meta().operation
    }

    /// Identity of the enclosing elements, or `None` for top-level parameters
    pub fn parent(&self) -> Option<&ParentPath> {
        self.meta().parent.as_ref()
    }

    /// Current value of a leaf; composites carry no value of their own
    pub fn value(&self) -> Option<&ParameterValue> {
        match self {
            ParameterElement::Leaf(leaf) => leaf.value(),
            _ => None,
        }
    }

    /// Whether every leaf underneath (or the leaf itself) holds a value
    pub fn has_value(&self) -> bool {
        match self {
            ParameterElement::Leaf(leaf) => leaf.has_value(),
            ParameterElement::Object(object) => {
                object.properties.values().all(ParameterElement::has_value)
            }
            ParameterElement::Array(array) => {
                array.elements.iter().all(ParameterElement::has_value)
            }
            ParameterElement::Combined(combined) => {
                combined.schemas.iter().any(ParameterElement::has_value)
            }
        }
    }

    // Variant access

    pub fn as_leaf(&self) -> Option<&LeafParameter> {
        match self {
            ParameterElement::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafParameter> {
        match self {
            ParameterElement::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectParameter> {
        match self {
            ParameterElement::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectParameter> {
        match self {
            ParameterElement::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayParameter> {
        match self {
            ParameterElement::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayParameter> {
        match self {
            ParameterElement::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_combined(&self) -> Option<&CombinedParameter> {
        match self {
            ParameterElement::Combined(combined) => Some(combined),
            _ => None,
        }
    }

    // Guarded mutation

    pub fn set_required(&mut self, required: bool) -> Result<()> {
        self.meta().ensure_mutable()?;
        self.meta_mut().required = required;
        Ok(())
    }

    pub fn set_style(&mut self, style: ParameterStyle) -> Result<()> {
        self.meta().ensure_mutable()?;
        self.meta_mut().style = style;
        Ok(())
    }

    pub fn set_explode(&mut self, explode: bool) -> Result<()> {
        self.meta().ensure_mutable()?;
        self.meta_mut().explode = explode;
        Ok(())
    }

    /// Add an example value through the ingestion policy: compliant values
    /// are stored, coercible ones are cast with a warning, the rest are
    /// discarded. Returns whether a value was stored.
    pub fn add_example(&mut self, value: ParameterValue) -> Result<bool> {
        self.meta().ensure_mutable()?;
        Ok(self.meta_mut().add_example_value(&value))
    }

    pub fn set_normalized_name(&mut self, normalized_name: NormalizedName) -> Result<()> {
        self.meta().ensure_mutable()?;
        self.meta_mut().normalized_name = normalized_name;
        Ok(())
    }

    pub fn set_parent(&mut self, parent: Option<ParentPath>) -> Result<()> {
        self.meta().ensure_mutable()?;
        self.meta_mut().parent = parent;
        Ok(())
    }

    // Cloning

    /// An exact deep copy: no container is shared with the source, the
    /// operation and parent links are retained
    pub fn deep_clone(&self) -> ParameterElement {
        self.clone()
    }

    /// A deep copy rebound to a new operation and parent.
    ///
    /// Children are recursively rebound to the new owning node, so the whole
    /// subtree stays internally consistent. Cloning a read-only template into
    /// a mutable operation is the only way to obtain an editable tree.
    pub fn deep_clone_into(
        &self,
        operation: &OperationHandle,
        parent: Option<ParentPath>,
    ) -> ParameterElement {
        let mut cloned = self.clone();
        cloned.rebind(operation, parent);
        cloned
    }

    fn rebind(&mut self, operation: &OperationHandle, parent: Option<ParentPath>) {
        self.meta_mut().rebind(operation, parent);
        let child_path = self.meta().child_path();
        match self {
            ParameterElement::Leaf(_) => {}
            ParameterElement::Object(object) => {
                for child in object.properties.values_mut() {
                    child.rebind(operation, Some(child_path.clone()));
                }
            }
            ParameterElement::Array(array) => {
                array.reference.rebind(operation, Some(child_path.clone()));
                for element in &mut array.elements {
                    element.rebind(operation, Some(child_path.clone()));
                }
            }
            ParameterElement::Combined(combined) => {
                for schema in &mut combined.schemas {
                    schema.rebind(operation, Some(child_path.clone()));
                }
            }
        }
    }

    // Merging

    /// Unify two declarations of the same logical parameter into a fresh
    /// tree. Declared types must agree; enum values and examples become the
    /// set union; the caller's default value wins when both are present.
    /// Neither operand is mutated.
    pub fn merge(&self, other: &ParameterElement) -> Result<ParameterElement> {
        match (self, other) {
            (ParameterElement::Leaf(ours), ParameterElement::Leaf(theirs)) => {
                if ours.meta.kind != theirs.meta.kind {
                    return Err(ParameterError::MergeTypeMismatch {
                        name: ours.meta.name.to_string(),
                        left: ours.meta.kind.to_string(),
                        right: theirs.meta.kind.to_string(),
                    });
                }
                Ok(ParameterElement::Leaf(LeafParameter {
                    meta: ours.meta.merged_with(&theirs.meta),
                    value: ours.value.clone(),
                }))
            }
            (ParameterElement::Object(ours), ParameterElement::Object(theirs)) => {
                ours.merge(theirs).map(ParameterElement::Object)
            }
            (ParameterElement::Array(ours), ParameterElement::Array(theirs)) => {
                ours.merge(theirs).map(ParameterElement::Array)
            }
            (ParameterElement::Combined(ours), ParameterElement::Combined(theirs)) => {
                ours.merge(theirs).map(ParameterElement::Combined)
            }
            (ours, theirs) => Err(ParameterError::MergeTypeMismatch {
                name: ours.name().to_string(),
                left: ours.describe(),
                right: theirs.describe(),
            }),
        }
    }

    /// Short description of the element's declared shape, used in errors
    pub fn describe(&self) -> String {
        match self {
            ParameterElement::Leaf(leaf) => leaf.meta.kind.to_string(),
            ParameterElement::Object(_) => "object".to_string(),
            ParameterElement::Array(_) => "array".to_string(),
            ParameterElement::Combined(combined) => {
                format!("{} combined schema", combined.kind)
            }
        }
    }

    // Traversal

    /// All array elements of the subtree, this element included
    pub fn arrays(&self) -> Vec<&ArrayParameter> {
        let mut found = Vec::new();
        self.collect_arrays(&mut found);
        found
    }

    fn collect_arrays<'a>(&'a self, found: &mut Vec<&'a ArrayParameter>) {
        match self {
            ParameterElement::Leaf(_) => {}
            ParameterElement::Object(object) => {
                for child in object.properties.values() {
                    child.collect_arrays(found);
                }
            }
            ParameterElement::Array(array) => {
                found.push(array);
                array.reference.collect_arrays(found);
                for element in &array.elements {
                    element.collect_arrays(found);
                }
            }
            ParameterElement::Combined(combined) => {
                for schema in &combined.schemas {
                    schema.collect_arrays(found);
                }
            }
        }
    }

    /// All leaf elements of the subtree, this element included
    pub fn leaves(&self) -> Vec<&LeafParameter> {
        let mut found = Vec::new();
        self.collect_leaves(&mut found);
        found
    }

    fn collect_leaves<'a>(&'a self, found: &mut Vec<&'a LeafParameter>) {
        match self {
            ParameterElement::Leaf(leaf) => found.push(leaf),
            ParameterElement::Object(object) => {
                for child in object.properties.values() {
                    child.collect_leaves(found);
                }
            }
            ParameterElement::Array(array) => {
                array.reference.collect_leaves(found);
                for element in &array.elements {
                    element.collect_leaves(found);
                }
            }
            ParameterElement::Combined(combined) => {
                for schema in &combined.schemas {
                    schema.collect_leaves(found);
                }
            }
        }
    }

    /// All combined-schema elements of the subtree, this element included
    pub fn combined_schemas(&self) -> Vec<&CombinedParameter> {
        let mut found = Vec::new();
        self.collect_combined(&mut found);
        found
    }

    fn collect_combined<'a>(&'a self, found: &mut Vec<&'a CombinedParameter>) {
        match self {
            ParameterElement::Leaf(_) => {}
            ParameterElement::Object(object) => {
                for child in object.properties.values() {
                    child.collect_combined(found);
                }
            }
            ParameterElement::Array(array) => {
                array.reference.collect_combined(found);
                for element in &array.elements {
                    element.collect_combined(found);
                }
            }
            ParameterElement::Combined(combined) => {
                found.push(combined);
                for schema in &combined.schemas {
                    schema.collect_combined(found);
                }
            }
        }
    }

    // Example distribution

    pub(crate) fn absorb_example(&mut self, value: &ParameterValue) {
        match self {
            ParameterElement::Leaf(leaf) => leaf.absorb_example(value),
            ParameterElement::Object(object) => object.absorb_example(value),
            ParameterElement::Array(array) => array.absorb_example(value),
            ParameterElement::Combined(combined) => combined.absorb_example(value),
        }
    }

    // JSON output

    /// The current value tree as a JSON value, for body serialization.
    ///
    /// Unassigned leaves render as JSON null; a combined schema contributes
    /// its first candidate holding a value.
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            ParameterElement::Leaf(leaf) => leaf
                .value()
                .map(ParameterValue::to_json)
                .unwrap_or(JsonValue::Null),
            ParameterElement::Object(object) => JsonValue::Object(
                object
                    .properties
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_json_value()))
                    .collect(),
            ),
            ParameterElement::Array(array) => JsonValue::Array(
                array
                    .elements
                    .iter()
                    .map(ParameterElement::to_json_value)
                    .collect(),
            ),
            ParameterElement::Combined(combined) => combined
                .schemas
                .iter()
                .find(|schema| schema.has_value())
                .map(ParameterElement::to_json_value)
                .unwrap_or(JsonValue::Null),
        }
    }
}

impl PartialEq for ParameterElement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParameterElement::Leaf(a), ParameterElement::Leaf(b)) => a == b,
            (ParameterElement::Object(a), ParameterElement::Object(b)) => a == b,
            (ParameterElement::Array(a), ParameterElement::Array(b)) => a == b,
            (ParameterElement::Combined(a), ParameterElement::Combined(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ParameterElement {}

impl Hash for ParameterElement {
    /// Hash only the fields equality relies on unconditionally, never the
    /// mutable value containers, so equal trees from differently ordered
    /// declarations hash identically
    fn hash<H: Hasher>(&self, state: &mut H) {
        let tag = match self {
            ParameterElement::Leaf(_) => 0u8,
            ParameterElement::Object(_) => 1,
            ParameterElement::Array(_) => 2,
            ParameterElement::Combined(_) => 3,
        };
        state.write_u8(tag);
        self.meta().hash_identity(state);
    }
}

impl fmt::Display for ParameterElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.meta().name,
            self.meta().normalized_name,
            self.meta().location
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{HttpMethod, Operation};
    use serde_json::json;

    fn operation() -> OperationHandle {
        Operation::new(HttpMethod::Get, "/pets").shared()
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let raw = json!({"in": "query", "schema": {"type": "string"}});
        let result = ParameterElement::from_raw(&raw, &operation(), None);
        assert!(matches!(result, Err(ParameterError::Creation(_))));

        // An explicit name rescues the declaration
        let named = ParameterElement::from_raw(&raw, &operation(), Some("status"));
        assert!(named.is_ok());
    }

    #[test]
    fn test_unresolvable_location_is_fatal() {
        let raw = json!({"name": "status", "in": "formData", "schema": {"type": "string"}});
        let result = ParameterElement::from_raw(&raw, &operation(), None);
        assert!(matches!(result, Err(ParameterError::Creation(_))));
    }

    #[test]
    fn test_style_and_explode_defaults() {
        let path = json!({"name": "petId", "in": "path", "schema": {"type": "integer"}});
        let parameter = ParameterElement::from_raw(&path, &operation(), None).unwrap();
        assert_eq!(parameter.style(), ParameterStyle::Simple);
        assert!(!parameter.explode());

        let query = json!({"name": "filter", "in": "query", "schema": {"type": "string"}});
        let parameter = ParameterElement::from_raw(&query, &operation(), None).unwrap();
        assert_eq!(parameter.style(), ParameterStyle::Form);
        assert!(parameter.explode());

        let explicit = json!({
            "name": "ids", "in": "query", "style": "pipeDelimited", "explode": true,
            "schema": {"type": "array", "items": {"type": "integer"}}
        });
        let parameter = ParameterElement::from_raw(&explicit, &operation(), None).unwrap();
        assert_eq!(parameter.style(), ParameterStyle::PipeDelimited);
        assert!(parameter.explode());
    }

    #[test]
    fn test_variant_inference_without_type() {
        let object = json!({"name": "pet", "schema": {"properties": {"id": {"type": "integer"}}}});
        let parameter = ParameterElement::from_raw(&object, &operation(), None).unwrap();
        assert!(parameter.as_object().is_some());

        let array = json!({"name": "ids", "schema": {"items": {"type": "integer"}}});
        let parameter = ParameterElement::from_raw(&array, &operation(), None).unwrap();
        assert!(parameter.as_array().is_some());

        let combined = json!({"name": "pet", "schema": {"oneOf": [{"type": "string"}]}});
        let parameter = ParameterElement::from_raw(&combined, &operation(), None).unwrap();
        assert!(parameter.as_combined().is_some());
    }

    #[test]
    fn test_merge_rejects_type_mismatch() {
        let number = json!({"name": "id", "in": "query", "schema": {"type": "integer"}});
        let string = json!({"name": "id", "in": "query", "schema": {"type": "string"}});
        let a = ParameterElement::from_raw(&number, &operation(), None).unwrap();
        let b = ParameterElement::from_raw(&string, &operation(), None).unwrap();
        assert!(matches!(
            a.merge(&b),
            Err(ParameterError::MergeTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_merge_unions_value_sets() {
        let first = json!({
            "name": "status", "in": "query",
            "schema": {"type": "string", "enum": ["available", "pending"], "default": "available"}
        });
        let second = json!({
            "name": "status", "in": "query",
            "schema": {"type": "string", "enum": ["pending", "sold"]},
            "example": "sold"
        });
        let a = ParameterElement::from_raw(&first, &operation(), None).unwrap();
        let b = ParameterElement::from_raw(&second, &operation(), None).unwrap();

        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.enum_values().len(), 3);
        assert_eq!(
            merged.default_value(),
            Some(&ParameterValue::String("available".to_string()))
        );
        assert!(
            merged
                .examples()
                .contains(&ParameterValue::String("sold".to_string()))
        );
        // Operands are untouched
        assert_eq!(a.enum_values().len(), 2);
        assert_eq!(b.enum_values().len(), 2);
    }

    #[test]
    fn test_traversals_reach_nested_elements() {
        let raw = json!({
            "name": "pet",
            "schema": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "tags": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {"name": {"type": "string"}}
                        }
                    }
                }
            }
        });
        let parameter = ParameterElement::from_raw(&raw, &operation(), None).unwrap();
        assert_eq!(parameter.arrays().len(), 1);
        // id, plus the name leaf inside the tags reference element
        assert_eq!(parameter.leaves().len(), 2);
        assert!(parameter.combined_schemas().is_empty());
    }
}
