//! Array parameters: a schema template plus concrete, independently valued
//! element instances.

use serde_json::{Map, Value as JsonValue};

use crate::error::{ParameterError, Result};
use crate::operation::OperationHandle;
use crate::parameter::ParameterElement;
use crate::parameter::meta::{ParameterMeta, schema_source};
use crate::parameter::name::ParentPath;
use crate::value::ParameterValue;

/// A parameter owning one anonymous reference element (the `items` schema
/// template) and an ordered sequence of concrete elements.
///
/// Concrete elements are deep clones of the reference element, valued
/// independently; they are kept type-consistent with the template.
#[derive(Debug, Clone)]
pub struct ArrayParameter {
    pub(crate) meta: ParameterMeta,
    pub(crate) reference: Box<ParameterElement>,
    pub(crate) elements: Vec<ParameterElement>,
}

impl ArrayParameter {
    /// Build an array parameter from a raw declaration map
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

        // The reference element is an anonymous template: empty name, its
        // normalized name borrowed from the enclosing array
        let reference = match source.get("items") {
            Some(items_raw) => ParameterElement::from_raw_with_parent(
                Some(child_path),
                items_raw,
                operation,
                Some(""),
            )?,
            None => {
                tracing::warn!(
                    "array parameter '{}' declares no items schema; using an untyped reference element",
                    meta.name
                );
                let empty = JsonValue::Object(Map::new());
                ParameterElement::from_raw_with_parent(
                    Some(child_path),
                    &empty,
                    operation,
                    Some(""),
                )?
            }
        };

        let mut array = Self {
            meta,
            reference: Box::new(reference),
            elements: Vec::new(),
        };

        // Items of the array's own example sequences are also visible in the
        // reference element's example set
        let own_examples: Vec<ParameterValue> = array.meta.examples.iter().cloned().collect();
        for example in &own_examples {
            array.distribute_example(example);
        }

        Ok(array)
    }

    /// The schema template for the array's items
    pub fn reference_element(&self) -> &ParameterElement {
        &self.reference
    }

    /// Concrete element instances in sequence order
    pub fn elements(&self) -> &[ParameterElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [ParameterElement] {
        &mut self.elements
    }

    /// Append a concrete element, typically a valued deep clone of the
    /// reference element.
    ///
    /// Elements that are not type-consistent with the reference element are
    /// refused with a warning; returns whether the element was added.
    pub fn add_element(&mut self, element: ParameterElement) -> Result<bool> {
        self.meta.ensure_mutable()?;
        if element.parameter_type() != self.reference.parameter_type() {
            tracing::warn!(
                "element of type {} is not consistent with the {} reference element of array '{}'; \
                 the element will be discarded",
                element.parameter_type(),
                self.reference.parameter_type(),
                self.meta.name
            );
            return Ok(false);
        }
        self.elements.push(element);
        Ok(true)
    }

    /// Remove every concrete element
    pub fn clear_elements(&mut self) -> Result<()> {
        self.meta.ensure_mutable()?;
        self.elements.clear();
        Ok(())
    }

    pub(crate) fn absorb_example(&mut self, value: &ParameterValue) {
        if self.meta.add_example_value(value) {
            self.distribute_example(value);
        }
    }

    fn distribute_example(&mut self, value: &ParameterValue) {
        let ParameterValue::Array(items) = value else {
            return;
        };
        for item in items {
            self.reference.absorb_example(item);
        }
    }

    /// Merge with another array declaration: reference elements merge
    /// recursively, the caller's concrete elements are kept
    pub(crate) fn merge(&self, other: &Self) -> Result<ArrayParameter> {
        let meta = self.meta.merged_with(&other.meta);
        let reference = self.reference.merge(&other.reference)?;
        Ok(ArrayParameter {
            meta,
            reference: Box::new(reference),
            elements: self.elements.clone(),
        })
    }
}

impl PartialEq for ArrayParameter {
    fn eq(&self, other: &Self) -> bool {
        self.meta.agrees_with(&other.meta)
            && self.reference == other.reference
            && self.elements == other.elements
    }
}

impl Eq for ArrayParameter {}
