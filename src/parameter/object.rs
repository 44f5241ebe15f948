//! Object parameters: declarations owning named properties.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::{ParameterError, Result};
use crate::operation::OperationHandle;
use crate::parameter::ParameterElement;
use crate::parameter::meta::{ParameterMeta, schema_source};
use crate::parameter::name::ParentPath;
use crate::value::ParameterValue;

/// A parameter owning an ordered mapping from property name to child element.
///
/// Declaration order of the properties is preserved for rendering; equality
/// ignores it.
#[derive(Debug, Clone)]
pub struct ObjectParameter {
    pub(crate) meta: ParameterMeta,
    pub(crate) properties: IndexMap<String, ParameterElement>,
}

impl ObjectParameter {
    /// Build an object parameter from a raw declaration map
    pub fn from_raw(
        raw: &JsonValue,
        operation: &OperationHandle,
        explicit_name: Option<&str>,
    ) -> Result<Self> {
        Self::from_raw_with_parent(None, raw, operation, explicit_name)
    }

    pub(crate) fn from_raw_with_parent(
        parent: Option<ParentPath>,
        raw: &JsonValue,
        operation: &OperationHandle,
        explicit_name: Option<&str>,
    ) -> Result<Self> {
        let meta = ParameterMeta::from_raw(parent, raw, operation, explicit_name)?;
        let map = raw.as_object().ok_or_else(|| {
            ParameterError::creation("parameter declaration must be a JSON object")
        })?;
        let source = schema_source(map);
        let child_path = meta.child_path();

        let mut properties = IndexMap::new();
        if let Some(declared) = source.get("properties").and_then(JsonValue::as_object) {
            for (property_name, property_raw) in declared {
                match ParameterElement::from_raw_with_parent(
                    Some(child_path.clone()),
                    property_raw,
                    operation,
                    Some(property_name),
                ) {
                    Ok(child) => {
                        properties.insert(property_name.clone(), child);
                    }
                    Err(error) => {
                        tracing::warn!(
                            "skipping malformed property '{property_name}' of parameter '{}': {error}",
                            meta.name
                        );
                    }
                }
            }
        }

        // The object-level `required` field lists required property names
        if let Some(required) = source.get("required").and_then(JsonValue::as_array) {
            for name in required.iter().filter_map(JsonValue::as_str) {
                if let Some(child) = properties.get_mut(name) {
                    child.meta_mut().required = true;
                }
            }
        }

        let mut object = Self { meta, properties };

        // Each of the object's own example mappings is also visible, entry by
        // entry, in the matching properties' example sets. Enum values and
        // defaults stay at their declaring level.
        let own_examples: Vec<ParameterValue> = object.meta.examples.iter().cloned().collect();
        for example in &own_examples {
            object.distribute_example(example);
        }

        Ok(object)
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &IndexMap<String, ParameterElement> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&ParameterElement> {
        self.properties.get(name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut ParameterElement> {
        self.properties.get_mut(name)
    }

    pub(crate) fn absorb_example(&mut self, value: &ParameterValue) {
        if self.meta.add_example_value(value) {
            self.distribute_example(value);
        }
    }

    fn distribute_example(&mut self, value: &ParameterValue) {
        let ParameterValue::Object(entries) = value else {
            return;
        };
        for (name, entry) in entries {
            if let Some(child) = self.properties.get_mut(name) {
                child.absorb_example(entry);
            }
        }
    }

    /// Merge with another object declaration of the same logical parameter:
    /// properties present in both are merged recursively, the rest are added
    pub(crate) fn merge(&self, other: &Self) -> Result<ObjectParameter> {
        let meta = self.meta.merged_with(&other.meta);
        let child_path = meta.child_path();

        let mut properties = self.properties.clone();
        for (name, theirs) in &other.properties {
            match properties.get_mut(name) {
                Some(ours) => {
                    *ours = ours.merge(theirs)?;
                }
                None => {
                    let adopted =
                        theirs.deep_clone_into(&meta.operation, Some(child_path.clone()));
                    properties.insert(name.clone(), adopted);
                }
            }
        }

        Ok(ObjectParameter { meta, properties })
    }
}

impl PartialEq for ObjectParameter {
    fn eq(&self, other: &Self) -> bool {
        // IndexMap equality is order-independent, matching the declaration
        // order irrelevance of structural equality
        self.meta.agrees_with(&other.meta) && self.properties == other.properties
    }
}

impl Eq for ObjectParameter {}
