//! Field values and coercion.
//!
//! Incoming record values are converted to the declared [`FieldKind`] of
//! their field. A value that cannot be converted is kept as received in
//! [`FieldValue::Json`]; `null` is always kept that way.
//!
//! | Kind       | Accepted input                                          |
//! |------------|---------------------------------------------------------|
//! | `Int`      | integer, float (truncated toward zero), bool, integer string |
//! | `Float`    | number, bool, numeric string                            |
//! | `Str`      | string, number, bool                                    |
//! | `Bool`     | bool, number (non-zero is `true`), `"true"` / `"false"` |
//! | `Json`     | anything                                                |
//! | `Relation` | integer or integer string (bare id); objects become nested instances |

use serde_json::{Number, Value};

use crate::rest::{FieldKind, Resource};

/// The value held by a field of a [`Resource`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// A raw JSON value: `Json` fields, and values that could not be coerced.
    Json(Value),
    /// A hydrated related instance.
    Resource(Box<Resource>),
}

impl FieldValue {
    /// Converts the value to JSON for a payload. Related instances are
    /// replaced by their id.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Str(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Json(v) => v.clone(),
            Self::Resource(r) => Value::from(r.id()),
        }
    }

    /// Returns `true` if the field holds what `incoming` describes.
    ///
    /// Numbers compare by value across integer and float encodings. A
    /// related instance matches an incoming object with the same `id`, or
    /// the bare id itself.
    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    #[must_use]
    pub fn matches(&self, incoming: &Value) -> bool {
        match (self, incoming) {
            (Self::Resource(r), Value::Object(map)) => {
                map.get("id").and_then(Value::as_u64) == Some(r.id())
            }
            (Self::Resource(r), other) => other.as_u64() == Some(r.id()),
            (Self::Int(i), Value::Number(n)) => {
                n.as_i64() == Some(*i) || (!n.is_i64() && n.as_f64() == Some(*i as f64))
            }
            (Self::Float(f), Value::Number(n)) => n.as_f64() == Some(*f),
            (Self::Int(i), Value::Bool(b)) => i64::from(*b) == *i,
            (Self::Float(f), Value::Bool(b)) => f64::from(u8::from(*b)) == *f,
            (Self::Bool(b), Value::Bool(v)) => b == v,
            (Self::Bool(b), Value::Number(n)) => n.as_f64() == Some(f64::from(u8::from(*b))),
            (Self::Str(s), Value::String(v)) => s == v,
            (Self::Json(v), incoming) => v == incoming,
            _ => false,
        }
    }

    /// Returns the integer, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number, if this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the raw value, if this is a `Json`.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the related instance, if the field holds one.
    #[must_use]
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the related instance mutably, if the field holds one.
    pub fn as_resource_mut(&mut self) -> Option<&mut Resource> {
        match self {
            Self::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Returns `true` for a raw `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }
}

impl FieldKind {
    /// Returns the value a freshly created instance holds for this kind.
    ///
    /// Relations start out as `null`.
    #[must_use]
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Int => FieldValue::Int(0),
            Self::Float => FieldValue::Float(0.0),
            Self::Str => FieldValue::Str(String::new()),
            Self::Bool => FieldValue::Bool(false),
            Self::Json | Self::Relation(_) => FieldValue::Json(Value::Null),
        }
    }

    /// Converts an incoming value to this kind.
    ///
    /// Returns `None` when no conversion applies; the caller keeps the raw
    /// value. Objects sent for a relation also yield `None` here, since
    /// building the nested instance needs a configured [`Resource`].
    #[must_use]
    pub fn coerce(&self, value: &Value) -> Option<FieldValue> {
        if value.is_null() {
            return None;
        }

        match self {
            Self::Int => coerce_int(value).map(FieldValue::Int),
            Self::Float => coerce_float(value).map(FieldValue::Float),
            Self::Str => coerce_str(value).map(FieldValue::Str),
            Self::Bool => coerce_bool(value).map(FieldValue::Bool),
            Self::Json => Some(FieldValue::Json(value.clone())),
            Self::Relation(_) => match value {
                Value::Number(n) => n.as_i64().map(FieldValue::Int),
                Value::String(s) => s.trim().parse().ok().map(FieldValue::Int),
                _ => None,
            },
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && !n.is_u64())
                .map(|f| f as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Resource> for FieldValue {
    fn from(value: Resource) -> Self {
        Self::Resource(Box::new(value))
    }
}
