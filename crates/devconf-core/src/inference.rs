//! Type inference for raw attribute values.

use crate::attribute::AttributeType;
use crate::value::AttributeValue;

/// Classify a raw value. Total: values that cannot be typed are
/// [`AttributeType::Unresolved`].
pub fn infer_type(value: &AttributeValue) -> AttributeType {
    match value {
        AttributeValue::Null => AttributeType::Null,
        AttributeValue::Bool(_) => AttributeType::Bool,
        AttributeValue::String(_) => AttributeType::String,
        AttributeValue::Number(n) if !n.is_finite() => AttributeType::Unresolved,
        AttributeValue::Number(n) if n.fract() == 0.0 => AttributeType::Int,
        AttributeValue::Number(_) => AttributeType::Float,
        AttributeValue::Other(_) => AttributeType::Unresolved,
    }
}
