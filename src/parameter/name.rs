//! Parameter names, normalized names and parent identity paths.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters stripped when canonicalizing a name
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Declared identifier of a parameter.
///
/// Empty only for anonymous array item templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterName(String);

impl ParameterName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ParameterName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical form of a parameter name, used to recognize the same logical
/// parameter across independently parsed specifications.
///
/// Computed once at construction: the originating schema name wins over the
/// declared name, anonymous elements borrow the nearest named ancestor, and
/// the result is lowercased with every non-alphanumeric run removed. The
/// computation is deterministic and independent of any map iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub fn compute(
        name: &ParameterName,
        schema_name: Option<&str>,
        parent: Option<&ParentPath>,
    ) -> Self {
        let source = match schema_name {
            Some(schema) if !schema.is_empty() => schema,
            _ if !name.is_empty() => name.as_str(),
            _ => parent
                .and_then(ParentPath::last_named)
                .map(ParameterName::as_str)
                .unwrap_or(""),
        };
        Self(canonicalize(source))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn canonicalize(source: &str) -> String {
    NON_ALNUM.replace_all(source, "").to_lowercase()
}

/// Non-owning identity of the enclosing elements of a parameter: the chain of
/// ancestor names from the tree root down to the direct parent.
///
/// Top-level parameters carry no path. The path is used only for equality
/// gating (a parameter with a parent compares normalized names, one without
/// does not) and as structural context for normalized-name computation; it
/// never owns or reaches the actual parent node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParentPath(Vec<ParameterName>);

impl ParentPath {
    /// Path for the children of a top-level element
    pub fn root(name: &ParameterName) -> Self {
        Self(vec![name.clone()])
    }

    /// Path for the children of a nested element whose own parent path is `self`
    pub fn child(&self, name: &ParameterName) -> Self {
        let mut names = self.0.clone();
        names.push(name.clone());
        Self(names)
    }

    pub fn names(&self) -> &[ParameterName] {
        &self.0
    }

    /// Deepest ancestor with a non-empty name, if any
    pub fn last_named(&self) -> Option<&ParameterName> {
        self.0.iter().rev().find(|name| !name.is_empty())
    }
}

impl fmt::Display for ParentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.0.iter().map(ParameterName::as_str).collect();
        write!(f, "{}", parts.join("."))
    }
}
