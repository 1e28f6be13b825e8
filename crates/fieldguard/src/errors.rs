//! Validation error records
//!
//! Records are data, not failures: a validator reports at most one of them
//! for a value. Each record serialises as
//! `{ "type": "...", "label": "...", "value": ..., "reasons": { ... } }`.

use std::fmt;

use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::model::FieldValue;

/// Discriminant of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    Required,
    MinimumLength,
    MaximumLength,
    MinValue,
    MaxValue,
    Number,
    NumberFraction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredReasons {
    pub required: &'static str,
}

impl Default for RequiredReasons {
    fn default() -> Self {
        Self {
            required: "required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimumLengthReasons {
    pub minimum_length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaximumLengthReasons {
    pub maximum_length: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinValueReasons {
    pub min_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxValueReasons {
    pub max_value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberReasons {
    /// Source of the integer pattern the value failed
    pub regex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFractionReasons {
    /// Source of the fraction pattern the value failed
    pub regex: String,
    pub fraction_length: u32,
}

/// A rejected field value, with the rule it broke.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    Required {
        label: String,
        value: FieldValue,
        reasons: RequiredReasons,
    },
    MinimumLength {
        label: String,
        value: FieldValue,
        reasons: MinimumLengthReasons,
    },
    MaximumLength {
        label: String,
        value: FieldValue,
        reasons: MaximumLengthReasons,
    },
    MinValue {
        label: String,
        value: FieldValue,
        reasons: MinValueReasons,
    },
    MaxValue {
        label: String,
        value: FieldValue,
        reasons: MaxValueReasons,
    },
    Number {
        label: String,
        value: FieldValue,
        reasons: NumberReasons,
    },
    NumberFraction {
        label: String,
        value: FieldValue,
        reasons: NumberFractionReasons,
    },
}

impl ValidationError {
    pub fn required(label: impl Into<String>, value: FieldValue) -> Self {
        Self::Required {
            label: label.into(),
            value,
            reasons: RequiredReasons::default(),
        }
    }

    pub fn minimum_length(label: impl Into<String>, value: FieldValue, minimum_length: u64) -> Self {
        Self::MinimumLength {
            label: label.into(),
            value,
            reasons: MinimumLengthReasons { minimum_length },
        }
    }

    pub fn maximum_length(label: impl Into<String>, value: FieldValue, maximum_length: u64) -> Self {
        Self::MaximumLength {
            label: label.into(),
            value,
            reasons: MaximumLengthReasons { maximum_length },
        }
    }

    pub fn min_value(label: impl Into<String>, value: FieldValue, min_value: f64) -> Self {
        Self::MinValue {
            label: label.into(),
            value,
            reasons: MinValueReasons { min_value },
        }
    }

    pub fn max_value(label: impl Into<String>, value: FieldValue, max_value: f64) -> Self {
        Self::MaxValue {
            label: label.into(),
            value,
            reasons: MaxValueReasons { max_value },
        }
    }

    pub fn number(label: impl Into<String>, value: FieldValue, regex: impl Into<String>) -> Self {
        Self::Number {
            label: label.into(),
            value,
            reasons: NumberReasons {
                regex: regex.into(),
            },
        }
    }

    pub fn number_fraction(
        label: impl Into<String>,
        value: FieldValue,
        regex: impl Into<String>,
        fraction_length: u32,
    ) -> Self {
        Self::NumberFraction {
            label: label.into(),
            value,
            reasons: NumberFractionReasons {
                regex: regex.into(),
                fraction_length,
            },
        }
    }

    pub const fn error_type(&self) -> ErrorType {
        match self {
            Self::Required { .. } => ErrorType::Required,
            Self::MinimumLength { .. } => ErrorType::MinimumLength,
            Self::MaximumLength { .. } => ErrorType::MaximumLength,
            Self::MinValue { .. } => ErrorType::MinValue,
            Self::MaxValue { .. } => ErrorType::MaxValue,
            Self::Number { .. } => ErrorType::Number,
            Self::NumberFraction { .. } => ErrorType::NumberFraction,
        }
    }

    /// Caller-supplied label of the field
    pub fn label(&self) -> &str {
        match self {
            Self::Required { label, .. }
            | Self::MinimumLength { label, .. }
            | Self::MaximumLength { label, .. }
            | Self::MinValue { label, .. }
            | Self::MaxValue { label, .. }
            | Self::Number { label, .. }
            | Self::NumberFraction { label, .. } => label,
        }
    }

    /// The rejected value, exactly as it was validated
    pub const fn value(&self) -> &FieldValue {
        match self {
            Self::Required { value, .. }
            | Self::MinimumLength { value, .. }
            | Self::MaximumLength { value, .. }
            | Self::MinValue { value, .. }
            | Self::MaxValue { value, .. }
            | Self::Number { value, .. }
            | Self::NumberFraction { value, .. } => value,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (value: {})", self.label(), self.error_type(), self.value())
    }
}
