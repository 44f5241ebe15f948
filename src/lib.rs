//! Parameter tree model and OpenAPI style/explode serialization for REST API
//! test generation.
//!
//! This crate models the parameters of an HTTP operation as a polymorphic
//! tree (scalar leaves, objects, arrays, combined schemas) built from the
//! nested key/value maps an external specification parser produces, and
//! renders their runtime values into wire-format strings following the
//! OpenAPI parameter-style encoding rules.
//!
//! Trees parsed from a specification belong to a read-only operation and act
//! as immutable templates; deep cloning into a mutable operation is the only
//! way to obtain an editable tree.
//!
//! # Examples
//!
//! ```
//! use restgen_params::{HttpMethod, Operation, ParameterElement, ParameterValue};
//! use serde_json::json;
//!
//! let template_op = Operation::read_only(HttpMethod::Get, "/pets").shared();
//! let raw = json!({
//!     "name": "status",
//!     "in": "query",
//!     "schema": { "type": "string", "enum": ["available", "sold"] }
//! });
//! let template = ParameterElement::from_raw(&raw, &template_op, None).unwrap();
//!
//! // The template is read-only; clone it into a mutable operation to edit.
//! let working_op = template_op.to_mutable().shared();
//! let mut working = template.deep_clone_into(&working_op, None);
//! working
//!     .as_leaf_mut()
//!     .unwrap()
//!     .set_value(ParameterValue::from(json!("sold")))
//!     .unwrap();
//!
//! assert_eq!(working.render(), "status=sold");
//! ```

pub mod error;
pub mod operation;
pub mod parameter;
mod render;
pub mod value;

pub use error::{CoercionError, ParameterError, Result};
pub use operation::{HttpMethod, Operation, OperationHandle};
pub use parameter::{
    ArrayParameter, CombinedKind, CombinedParameter, LeafParameter, NormalizedName,
    ObjectParameter, ParameterElement, ParameterLocation, ParameterName, ParameterStyle,
    ParameterType, ParentPath,
};
pub use value::{Number, ParameterValue};
pub use value::compliance::{coerce, is_compliant};
