//! Leaf parameters: string, number/integer, boolean and null declarations.

use serde_json::Value as JsonValue;

use crate::error::{ParameterError, Result};
use crate::operation::OperationHandle;
use crate::parameter::meta::ParameterMeta;
use crate::parameter::name::ParentPath;
use crate::parameter::types::ParameterType;
use crate::value::ParameterValue;
use crate::value::compliance;

/// A scalar parameter carrying zero or one current value.
///
/// The declared kind drives compliance of the current value and of every
/// ingested default/enum/example. A null-kind leaf always holds `Null`.
#[derive(Debug, Clone)]
pub struct LeafParameter {
    pub(crate) meta: ParameterMeta,
    pub(crate) value: Option<ParameterValue>,
}

impl LeafParameter {
    /// Build a leaf parameter from a raw declaration map
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
        let value = initial_value(meta.kind);
        Ok(Self { meta, value })
    }

    /// The current value, if one has been assigned
    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Assign the current value. Assignments are never coerced: a value that
    /// is not compliant with the declared kind is rejected.
    pub fn set_value(&mut self, value: ParameterValue) -> Result<()> {
        self.meta.ensure_mutable()?;
        if !compliance::is_compliant(&value, self.meta.kind) {
            return Err(ParameterError::NonCompliantValue {
                value: value.to_string(),
                expected: self.meta.kind,
            });
        }
        self.value = Some(value);
        Ok(())
    }

    /// Drop the current value, returning the leaf to its unassigned state
    pub fn clear_value(&mut self) -> Result<()> {
        self.meta.ensure_mutable()?;
        self.value = initial_value(self.meta.kind);
        Ok(())
    }

    /// A copy of this leaf re-declared under a different scalar kind.
    ///
    /// Identity, constraints and value sets are preserved; the current value
    /// is reset to the new kind's initial state. Used by consumers that swap
    /// a concrete value for an explicit null (or back) during test mutation.
    pub fn converted_to(&self, kind: ParameterType) -> LeafParameter {
        let mut meta = self.meta.clone();
        meta.kind = kind;
        LeafParameter {
            meta,
            value: initial_value(kind),
        }
    }

    pub(crate) fn absorb_example(&mut self, value: &ParameterValue) {
        self.meta.add_example_value(value);
    }
}

/// A null-kind leaf is born holding the only value it can carry
fn initial_value(kind: ParameterType) -> Option<ParameterValue> {
    (kind == ParameterType::Null).then_some(ParameterValue::Null)
}

impl PartialEq for LeafParameter {
    fn eq(&self, other: &Self) -> bool {
        self.meta.agrees_with(&other.meta)
    }
}

impl Eq for LeafParameter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{HttpMethod, Operation};
    use crate::value::Number;
    use serde_json::json;

    fn operation() -> OperationHandle {
        Operation::new(HttpMethod::Get, "/pets").shared()
    }

    fn number_leaf() -> LeafParameter {
        let raw = json!({"name": "limit", "in": "query", "schema": {"type": "integer"}});
        LeafParameter::from_raw(&raw, &operation(), None).unwrap()
    }

    #[test]
    fn test_set_value_requires_compliance() {
        let mut leaf = number_leaf();
        assert!(!leaf.has_value());

        leaf.set_value(ParameterValue::Number(Number::Int(5))).unwrap();
        assert_eq!(leaf.value(), Some(&ParameterValue::Number(Number::Int(5))));

        let rejected = leaf.set_value(ParameterValue::String("5".to_string()));
        assert!(matches!(
            rejected,
            Err(ParameterError::NonCompliantValue { .. })
        ));
        // The previous value survives a rejected assignment
        assert_eq!(leaf.value(), Some(&ParameterValue::Number(Number::Int(5))));
    }

    #[test]
    fn test_null_kind_always_holds_null() {
        let raw = json!({"name": "nothing", "in": "query", "schema": {"type": "null"}});
        let leaf = LeafParameter::from_raw(&raw, &operation(), None).unwrap();
        assert_eq!(leaf.value(), Some(&ParameterValue::Null));
    }

    #[test]
    fn test_conversion_keeps_identity_and_resets_value() {
        let mut leaf = number_leaf();
        leaf.set_value(ParameterValue::Number(Number::Int(7))).unwrap();

        let null_leaf = leaf.converted_to(ParameterType::Null);
        assert_eq!(null_leaf.meta.name, leaf.meta.name);
        assert_eq!(null_leaf.meta.location, leaf.meta.location);
        assert_eq!(null_leaf.value(), Some(&ParameterValue::Null));

        // Round trip back to the original kind
        let number_again = null_leaf.converted_to(ParameterType::Integer);
        assert_eq!(number_again, leaf.converted_to(ParameterType::Integer));
        assert!(!number_again.has_value());
    }
}
