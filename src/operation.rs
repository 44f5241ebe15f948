//! Minimal model of the operation owning a parameter tree.
//!
//! The full operation/document model lives outside this crate; parameters only
//! need an identity (method + endpoint) and the read-only flag that gates
//! every mutation. Operations parsed from a specification document are marked
//! read-only, so their parameter trees act as immutable templates; the only
//! way to obtain an editable tree is to deep clone it into a mutable
//! operation handle.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// HTTP methods supported by OpenAPI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Get all HTTP methods as an array
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Head,
            HttpMethod::Options,
        ]
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "get"),
            HttpMethod::Post => write!(f, "post"),
            HttpMethod::Put => write!(f, "put"),
            HttpMethod::Delete => write!(f, "delete"),
            HttpMethod::Patch => write!(f, "patch"),
            HttpMethod::Head => write!(f, "head"),
            HttpMethod::Options => write!(f, "options"),
        }
    }
}

/// Shared, non-owning handle to the operation a parameter belongs to.
///
/// Many parameters of the same tree reference the same handle; the handle is
/// only ever read by this crate.
pub type OperationHandle = Arc<Operation>;

/// The owning operation of a parameter tree.
///
/// Identity (equality and hashing) is the method plus the endpoint; the
/// read-only flag is deliberately excluded so that a mutable working copy
/// still compares equal to the template it was cloned from.
#[derive(Debug, Clone)]
pub struct Operation {
    method: HttpMethod,
    endpoint: String,
    read_only: bool,
}

impl Operation {
    /// Create a mutable operation, e.g. as the target of a deep clone
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            read_only: false,
        }
    }

    /// Create a read-only operation, as produced by specification parsing
    pub fn read_only(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            read_only: true,
        }
    }

    /// Wrap the operation in a shared handle
    pub fn shared(self) -> OperationHandle {
        Arc::new(self)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// A mutable twin of this operation, used as the target for deep clones
    /// of read-only parameter templates
    pub fn to_mutable(&self) -> Operation {
        Operation {
            method: self.method,
            endpoint: self.endpoint.clone(),
            read_only: false,
        }
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.endpoint == other.endpoint
    }
}

impl Eq for Operation {}

impl Hash for Operation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method.hash(state);
        self.endpoint.hash(state);
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.endpoint)
    }
}
