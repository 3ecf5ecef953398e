//! Typed parameter values and coercion from SED-ML textual overrides.
//!
//! Algorithm parameter overrides arrive as raw strings (`new_value` on an
//! algorithm parameter change). Each parameter declares a semantic type in
//! its [`crate::registry::ParameterSpec`]; [`coerce`] turns the raw string
//! into a [`ParameterValue`] of that type or fails with a typed error.

use serde::{Deserialize, Serialize};

use crate::error::ParameterTypeError;

/// Semantic type declared for an algorithm parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Float,
    Integer,
    Boolean,
    String,
    /// JSON array of primitives (numbers, booleans, strings).
    List,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::List => "list",
        };
        write!(f, "{}", name)
    }
}

/// A typed parameter value, as passed to a simulation method.
///
/// Untagged: values serialize as plain JSON primitives. `Integer` precedes
/// `Float` so whole JSON numbers deserialize without losing integerness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    List(Vec<ParameterValue>),
}

impl ParameterValue {
    /// Value as `f64`. Integers widen; everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Value as `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Value as `bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Value as `&str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

/// Coerce a raw textual override into a value of the declared type.
///
/// Deterministic and side-effect free. Fails with [`ParameterTypeError`]
/// when the raw string does not parse as the declared type.
pub fn coerce(raw: &str, expected: ValueType) -> Result<ParameterValue, ParameterTypeError> {
    let fail = || ParameterTypeError {
        value: raw.to_string(),
        expected,
    };

    let trimmed = raw.trim();
    match expected {
        ValueType::Float => trimmed
            .parse::<f64>()
            .map(ParameterValue::Float)
            .map_err(|_| fail()),
        ValueType::Integer => trimmed
            .parse::<i64>()
            .map(ParameterValue::Integer)
            .map_err(|_| fail()),
        ValueType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(ParameterValue::Boolean(true)),
            "false" | "0" => Ok(ParameterValue::Boolean(false)),
            _ => Err(fail()),
        },
        ValueType::String => Ok(ParameterValue::String(raw.to_string())),
        ValueType::List => {
            let parsed: serde_json::Value = serde_json::from_str(trimmed).map_err(|_| fail())?;
            let items = parsed.as_array().ok_or_else(fail)?;
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(json_primitive(item).ok_or_else(fail)?);
            }
            Ok(ParameterValue::List(values))
        }
    }
}

/// Map a JSON primitive to a value; arrays and objects are rejected.
fn json_primitive(value: &serde_json::Value) -> Option<ParameterValue> {
    match value {
        serde_json::Value::Bool(b) => Some(ParameterValue::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(ParameterValue::Integer(i))
            } else {
                n.as_f64().map(ParameterValue::Float)
            }
        }
        serde_json::Value::String(s) => Some(ParameterValue::String(s.clone())),
        _ => None,
    }
}
