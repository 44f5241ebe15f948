//! Type compliance checking and coercion of raw values.
//!
//! Default, enum and example values declared in a specification frequently
//! disagree with the declared parameter type. The ingestion policy is uniform
//! and best-effort: compliant values are stored as-is; non-compliant values
//! are coerced when a lossless conversion exists (with a "cast" warning);
//! everything else is discarded (with a "discarded" warning). No error ever
//! propagates from this path. Runtime value assignment never coerces.

use crate::error::CoercionError;
use crate::parameter::types::ParameterType;
use crate::value::{Number, ParameterValue};

/// True iff the value's runtime kind matches the declared type.
///
/// Numbers must be numeric and not boolean; the integer type additionally
/// requires an integral value; unknown-typed parameters accept nothing.
pub fn is_compliant(value: &ParameterValue, declared: ParameterType) -> bool {
    match declared {
        ParameterType::String => matches!(value, ParameterValue::String(_)),
        ParameterType::Number => matches!(value, ParameterValue::Number(_)),
        ParameterType::Integer => matches!(value, ParameterValue::Number(Number::Int(_))),
        ParameterType::Boolean => matches!(value, ParameterValue::Bool(_)),
        ParameterType::Object => matches!(value, ParameterValue::Object(_)),
        ParameterType::Array => matches!(value, ParameterValue::Array(_)),
        ParameterType::Null => matches!(value, ParameterValue::Null),
        ParameterType::Unknown => false,
    }
}

/// Attempt a type-preserving conversion of a non-compliant value.
///
/// Used only while populating default/enum/example sets, never for runtime
/// value assignment.
pub fn coerce(
    value: &ParameterValue,
    declared: ParameterType,
) -> std::result::Result<ParameterValue, CoercionError> {
    if is_compliant(value, declared) {
        return Ok(value.clone());
    }

    let coerced = match declared {
        ParameterType::String => match value {
            ParameterValue::Number(n) => Some(ParameterValue::String(n.to_string())),
            ParameterValue::Bool(b) => Some(ParameterValue::String(b.to_string())),
            _ => None,
        },
        ParameterType::Number => match value {
            ParameterValue::String(s) => parse_number(s),
            _ => None,
        },
        ParameterType::Integer => match value {
            ParameterValue::String(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .map(|i| ParameterValue::Number(Number::Int(i))),
            ParameterValue::Number(n) if n.is_integral() => {
                Some(ParameterValue::Number(Number::Int(n.as_f64() as i64)))
            }
            _ => None,
        },
        ParameterType::Boolean => match value {
            ParameterValue::String(s) if s.eq_ignore_ascii_case("true") => {
                Some(ParameterValue::Bool(true))
            }
            ParameterValue::String(s) if s.eq_ignore_ascii_case("false") => {
                Some(ParameterValue::Bool(false))
            }
            _ => None,
        },
        // Structured and null types have no sensible conversions
        ParameterType::Object
        | ParameterType::Array
        | ParameterType::Null
        | ParameterType::Unknown => None,
    };

    coerced.ok_or_else(|| CoercionError {
        value: value.to_string(),
        target: declared,
    })
}

fn parse_number(s: &str) -> Option<ParameterValue> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(ParameterValue::Number(Number::Int(i)));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .map(|f| ParameterValue::Number(Number::Float(f.into())))
}

/// Apply the ingestion policy for default/enum/example population.
///
/// Returns the value to store, or `None` when it must be dropped. `what`
/// names the target set ("default", "enum", "example") in warnings.
pub(crate) fn ingest(
    value: &ParameterValue,
    declared: ParameterType,
    what: &str,
) -> Option<ParameterValue> {
    if is_compliant(value, declared) {
        return Some(value.clone());
    }
    match coerce(value, declared) {
        Ok(cast) => {
            tracing::warn!(
                "{what} value '{value}' was not compliant to the {declared} parameter type, \
                 but it has been cast to fit it"
            );
            Some(cast)
        }
        Err(_) => {
            tracing::warn!(
                "{what} value '{value}' is not compliant to the {declared} parameter type; \
                 the value will be discarded"
            );
            None
        }
    }
}
