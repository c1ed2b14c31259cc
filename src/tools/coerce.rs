// ABOUTME: Argument validation and coercion against declared parameter schemas
// ABOUTME: Clamp-to-range for numeric bounds, pass-through-unchecked for enumerated strings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Argument coercion.
//!
//! Two deliberately different validation policies coexist here:
//!
//! - **clamp-to-range**: numeric fields with declared bounds are silently
//!   clamped to the nearest bound, never rejected (width=10 becomes 256).
//! - **pass-through-unchecked**: enumerated string fields are forwarded
//!   without a membership check; an invalid value surfaces as a remote API
//!   error rather than a local rejection.
//!
//! Whether the second should be tightened to match the first is an open
//! question on intended strictness; the policies are kept separate and
//! named rather than unified.

use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};

/// Primitive type of a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// UTF-8 string
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Number,
    /// true / false
    Boolean,
    /// Nested JSON object, forwarded opaque
    Object,
}

impl ParamType {
    /// JSON Schema type name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

/// One declared parameter of a tool's input schema
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Parameter name as it appears in the argument bag
    pub name: &'static str,
    /// Human-readable description, advertised in the schema
    pub description: &'static str,
    /// Expected primitive type
    pub param_type: ParamType,
    /// Whether the field must be present
    pub required: bool,
    /// Lower bound for numeric fields (clamp target)
    pub minimum: Option<f64>,
    /// Upper bound for numeric fields (clamp target)
    pub maximum: Option<f64>,
    /// Declared value set for enumerated strings; advertised, not enforced
    pub allowed_values: Option<&'static [&'static str]>,
    /// Numeric default, advertised in the schema; the remote API applies it
    pub default: Option<f64>,
}

impl ParamSpec {
    /// A required field of the given type
    #[must_use]
    pub const fn required(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            description,
            param_type,
            required: true,
            minimum: None,
            maximum: None,
            allowed_values: None,
            default: None,
        }
    }

    /// An optional field of the given type
    #[must_use]
    pub const fn optional(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            description,
            param_type,
            required: false,
            minimum: None,
            maximum: None,
            allowed_values: None,
            default: None,
        }
    }

    /// An optional integer clamped into `[minimum, maximum]`
    #[must_use]
    pub const fn bounded(
        name: &'static str,
        description: &'static str,
        minimum: f64,
        maximum: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            description,
            param_type: ParamType::Integer,
            required: false,
            minimum: Some(minimum),
            maximum: Some(maximum),
            allowed_values: None,
            default: Some(default),
        }
    }

    /// An optional float clamped into `[minimum, maximum]`
    #[must_use]
    pub const fn bounded_number(
        name: &'static str,
        description: &'static str,
        minimum: f64,
        maximum: f64,
        default: f64,
    ) -> Self {
        Self {
            param_type: ParamType::Number,
            ..Self::bounded(name, description, minimum, maximum, default)
        }
    }

    /// An optional string with a declared (but locally unenforced) value set
    #[must_use]
    pub const fn enumerated(
        name: &'static str,
        description: &'static str,
        allowed_values: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            description,
            param_type: ParamType::String,
            required: false,
            minimum: None,
            maximum: None,
            allowed_values: Some(allowed_values),
            default: None,
        }
    }

    fn coerce_value(&self, value: &Value) -> AppResult<Value> {
        match self.param_type {
            ParamType::String => value.as_str().map_or_else(
                || Err(self.type_error()),
                |s| {
                    // pass-through-unchecked: allowed_values is advertised in
                    // the schema but membership is left to the remote API
                    Ok(Value::String(s.to_owned()))
                },
            ),
            ParamType::Boolean => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| self.type_error()),
            ParamType::Object => {
                if value.is_object() {
                    Ok(value.clone())
                } else {
                    Err(self.type_error())
                }
            }
            ParamType::Integer => value
                .as_i64()
                .map(|i| Value::from(self.clamp_i64(i)))
                .ok_or_else(|| self.type_error()),
            ParamType::Number => value
                .as_f64()
                .map(|f| Value::from(self.clamp_f64(f)))
                .ok_or_else(|| self.type_error()),
        }
    }

    // clamp-to-range: out-of-bounds values snap to the nearest bound
    fn clamp_i64(&self, value: i64) -> i64 {
        let mut value = value;
        if let Some(min) = self.minimum {
            value = value.max(min as i64);
        }
        if let Some(max) = self.maximum {
            value = value.min(max as i64);
        }
        value
    }

    fn clamp_f64(&self, value: f64) -> f64 {
        let mut value = value;
        if let Some(min) = self.minimum {
            value = value.max(min);
        }
        if let Some(max) = self.maximum {
            value = value.min(max);
        }
        value
    }

    fn type_error(&self) -> AppError {
        AppError::invalid_input(format!(
            "parameter {} must be of type {}",
            self.name,
            self.param_type.as_str()
        ))
    }
}

/// Validate and normalize a raw argument bag against a declared schema.
///
/// The output contains only schema-declared fields. Absent and `null`
/// fields are omitted so the remote API applies its own defaults.
///
/// # Errors
///
/// Returns an invalid-params class error when the bag is not an object, a
/// required field is missing, or a present field has the wrong primitive
/// type.
pub fn coerce(specs: &[ParamSpec], args: Option<&Value>) -> AppResult<Map<String, Value>> {
    let empty;
    let bag = match args {
        None | Some(Value::Null) => {
            empty = Map::new();
            &empty
        }
        Some(Value::Object(map)) => map,
        Some(_) => return Err(AppError::invalid_input("arguments must be an object")),
    };

    let mut normalized = Map::new();
    for spec in specs {
        match bag.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(AppError::missing_field(spec.name));
                }
            }
            Some(value) => {
                normalized.insert(spec.name.to_owned(), spec.coerce_value(value)?);
            }
        }
    }
    Ok(normalized)
}
