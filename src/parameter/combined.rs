//! Combined-schema parameters: oneOf/anyOf/allOf declarations.

use serde_json::Value as JsonValue;

use crate::error::{ParameterError, Result};
use crate::operation::OperationHandle;
use crate::parameter::ParameterElement;
use crate::parameter::meta::{ParameterMeta, schema_source};
use crate::parameter::name::ParentPath;
use crate::parameter::types::CombinedKind;
use crate::value::ParameterValue;

/// A parameter declared as a combination of candidate sub-schemas.
///
/// Each candidate is a full parameter element sharing the combined
/// declaration's name; candidate order is irrelevant to equality.
#[derive(Debug, Clone)]
pub struct CombinedParameter {
    pub(crate) meta: ParameterMeta,
    pub(crate) kind: CombinedKind,
    pub(crate) schemas: Vec<ParameterElement>,
}

impl CombinedParameter {
    /// Build a combined-schema parameter from a raw declaration map
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
        let kind = CombinedKind::detect(source).ok_or_else(|| {
            ParameterError::creation(format!(
                "parameter '{}' declares no oneOf/anyOf/allOf schemas",
                meta.name
            ))
        })?;
        let child_path = meta.child_path();

        let mut schemas = Vec::new();
        if let Some(candidates) = source.get(kind.spec_key()).and_then(JsonValue::as_array) {
            for candidate_raw in candidates {
                match ParameterElement::from_raw_with_parent(
                    Some(child_path.clone()),
                    candidate_raw,
                    operation,
                    Some(meta.name.as_str()),
                ) {
                    Ok(candidate) => schemas.push(candidate),
                    Err(error) => {
                        tracing::warn!(
                            "skipping malformed {kind} candidate of parameter '{}': {error}",
                            meta.name
                        );
                    }
                }
            }
        }

        Ok(Self { meta, kind, schemas })
    }

    pub fn combined_kind(&self) -> CombinedKind {
        self.kind
    }

    /// Candidate sub-schemas in declaration order
    pub fn schemas(&self) -> &[ParameterElement] {
        &self.schemas
    }

    pub(crate) fn absorb_example(&mut self, value: &ParameterValue) {
        // Candidates are alternatives, not components: examples stay here
        self.meta.add_example_value(value);
    }

    /// Merge with another combined declaration of the same keyword: the
    /// candidate sets are united without duplicates
    pub(crate) fn merge(&self, other: &Self) -> Result<CombinedParameter> {
        if self.kind != other.kind {
            return Err(ParameterError::MergeTypeMismatch {
                name: self.meta.name.to_string(),
                left: self.kind.to_string(),
                right: other.kind.to_string(),
            });
        }

        let meta = self.meta.merged_with(&other.meta);
        let child_path = meta.child_path();
        let mut schemas = self.schemas.clone();
        for candidate in &other.schemas {
            if !schemas.contains(candidate) {
                schemas.push(candidate.deep_clone_into(&meta.operation, Some(child_path.clone())));
            }
        }

        Ok(CombinedParameter {
            meta,
            kind: self.kind,
            schemas,
        })
    }
}

impl PartialEq for CombinedParameter {
    fn eq(&self, other: &Self) -> bool {
        // Candidate sets compare as unordered collections
        self.meta.agrees_with(&other.meta)
            && self.kind == other.kind
            && self.schemas.len() == other.schemas.len()
            && self.schemas.iter().all(|s| other.schemas.contains(s))
            && other.schemas.iter().all(|s| self.schemas.contains(s))
    }
}

impl Eq for CombinedParameter {}
