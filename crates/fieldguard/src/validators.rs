//! Single-field validators
//!
//! Every validator inspects one value and yields at most one
//! [`ValidationError`]. Validators are asynchronous even when the check is
//! not, which keeps the composite pipeline uniform: built-in rules and a
//! caller's server round trip run through the same trait.
//!
//! The factory functions capture the label and limits at creation time.
//!
//! ```rust
//! use fieldguard::{validators, FieldValue, FormValues};
//!
//! # async fn example() {
//! let validator = validators::minimum_length("Name", 3);
//! let error = validator
//!     .validate(&FieldValue::from("ab"), &FormValues::new(), None)
//!     .await;
//! assert!(error.is_some());
//! # }
//! ```

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use regex::Regex;

use crate::{
    errors::ValidationError,
    model::{FieldMeta, FieldValue, FormValues},
    patterns::{self, FractionPattern},
};

// ============================================================================
// VALIDATOR TRAIT
// ============================================================================

/// A check on one field value.
///
/// `values` holds the whole form so a rule can compare fields; `meta` is the
/// form layer's state for this field, when it supplies one.
#[async_trait]
pub trait FieldValidator: Send + Sync {
    async fn validate(
        &self,
        value: &FieldValue,
        values: &FormValues,
        meta: Option<&FieldMeta>,
    ) -> Option<ValidationError>;
}

/// A shared validator using Arc for cheap cloning.
pub type ValidatorRef = Arc<dyn FieldValidator>;

struct FnValidator<F>(F);

#[async_trait]
impl<F, Fut> FieldValidator for FnValidator<F>
where
    F: Fn(FieldValue, FormValues, Option<FieldMeta>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<ValidationError>> + Send + 'static,
{
    async fn validate(
        &self,
        value: &FieldValue,
        values: &FormValues,
        meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        (self.0)(value.clone(), values.clone(), meta.cloned()).await
    }
}

/// Wrap an async closure as a validator.
///
/// The closure receives owned copies of its inputs, so it can move them into
/// a request without borrowing from the form.
///
/// ```rust
/// use fieldguard::{validators, ValidationError};
///
/// let unique_name = validators::from_fn(|value, _values, _meta| async move {
///     let taken = value.to_string() == "admin";
///     taken.then(|| ValidationError::required("Name", value))
/// });
/// ```
pub fn from_fn<F, Fut>(f: F) -> ValidatorRef
where
    F: Fn(FieldValue, FormValues, Option<FieldMeta>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<ValidationError>> + Send + 'static,
{
    Arc::new(FnValidator(f))
}

// ============================================================================
// COMMON VALIDATORS
// ============================================================================

/// Rejects missing values: null, blank text, empty lists and empty maps.
///
/// Booleans always fail; boolean fields use [`boolean_required`]. Numbers and
/// dates always pass.
pub fn required(label: impl Into<String>) -> ValidatorRef {
    Arc::new(Required {
        label: label.into(),
    })
}

/// Accepts only `true` and `false`.
pub fn boolean_required(label: impl Into<String>) -> ValidatorRef {
    Arc::new(BooleanRequired {
        label: label.into(),
    })
}

/// Rejects text or lists shorter than `minimum_length`.
pub fn minimum_length(label: impl Into<String>, minimum_length: u64) -> ValidatorRef {
    Arc::new(MinimumLength {
        label: label.into(),
        minimum_length,
    })
}

/// Rejects text or lists longer than `maximum_length`.
pub fn maximum_length(label: impl Into<String>, maximum_length: u64) -> ValidatorRef {
    Arc::new(MaximumLength {
        label: label.into(),
        maximum_length,
    })
}

/// Rejects values whose numeric reading is below `min_value`.
pub fn min_value(label: impl Into<String>, min_value: f64) -> ValidatorRef {
    Arc::new(MinValue {
        label: label.into(),
        min_value,
    })
}

/// Rejects values whose numeric reading is above `max_value`.
pub fn max_value(label: impl Into<String>, max_value: f64) -> ValidatorRef {
    Arc::new(MaxValue {
        label: label.into(),
        max_value,
    })
}

/// Rejects values that are not whole numbers, using the default pattern.
pub fn number(label: impl Into<String>) -> ValidatorRef {
    Arc::new(Number {
        label: label.into(),
        pattern: patterns::number_regex().cloned(),
    })
}

/// Like [`number`] with a caller-supplied integer pattern.
pub fn number_with(label: impl Into<String>, pattern: Regex) -> ValidatorRef {
    Arc::new(Number {
        label: label.into(),
        pattern: Some(pattern),
    })
}

/// Rejects values that fail `pattern(fraction_length)`.
///
/// The pattern is generated again for every value.
pub fn number_fraction(
    label: impl Into<String>,
    fraction_length: u32,
    pattern: FractionPattern,
) -> ValidatorRef {
    Arc::new(NumberFraction {
        label: label.into(),
        fraction_length,
        pattern,
    })
}

// ============================================================================
// RULES
// ============================================================================

struct Required {
    label: String,
}

#[async_trait]
impl FieldValidator for Required {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        (!is_present(value)).then(|| ValidationError::required(&self.label, value.clone()))
    }
}

fn is_present(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null | FieldValue::Bool(_) => false,
        FieldValue::Text(text) => !text.trim().is_empty(),
        FieldValue::List(items) => !items.is_empty(),
        FieldValue::Map(entries) => !entries.is_empty(),
        FieldValue::Number(_) | FieldValue::Date(_) => true,
    }
}

struct BooleanRequired {
    label: String,
}

#[async_trait]
impl FieldValidator for BooleanRequired {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        match value {
            FieldValue::Bool(_) => None,
            other => Some(ValidationError::required(&self.label, other.clone())),
        }
    }
}

struct MinimumLength {
    label: String,
    minimum_length: u64,
}

#[async_trait]
impl FieldValidator for MinimumLength {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        let too_short = value
            .length()
            .is_some_and(|length| to_u64(length) < self.minimum_length);

        too_short.then(|| {
            ValidationError::minimum_length(&self.label, value.clone(), self.minimum_length)
        })
    }
}

struct MaximumLength {
    label: String,
    maximum_length: u64,
}

#[async_trait]
impl FieldValidator for MaximumLength {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        let too_long = value
            .length()
            .is_some_and(|length| to_u64(length) > self.maximum_length);

        too_long.then(|| {
            ValidationError::maximum_length(&self.label, value.clone(), self.maximum_length)
        })
    }
}

fn to_u64(length: usize) -> u64 {
    u64::try_from(length).unwrap_or(u64::MAX)
}

struct MinValue {
    label: String,
    min_value: f64,
}

#[async_trait]
impl FieldValidator for MinValue {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        let below = value.as_number().is_some_and(|n| n < self.min_value);
        below.then(|| ValidationError::min_value(&self.label, value.clone(), self.min_value))
    }
}

struct MaxValue {
    label: String,
    max_value: f64,
}

#[async_trait]
impl FieldValidator for MaxValue {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        let above = value.as_number().is_some_and(|n| n > self.max_value);
        above.then(|| ValidationError::max_value(&self.label, value.clone(), self.max_value))
    }
}

struct Number {
    label: String,
    pattern: Option<Regex>,
}

#[async_trait]
impl FieldValidator for Number {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        if value.is_null() || matches(self.pattern.as_ref(), value) {
            return None;
        }

        Some(ValidationError::number(
            &self.label,
            value.clone(),
            pattern_source(self.pattern.as_ref()),
        ))
    }
}

struct NumberFraction {
    label: String,
    fraction_length: u32,
    pattern: FractionPattern,
}

#[async_trait]
impl FieldValidator for NumberFraction {
    async fn validate(
        &self,
        value: &FieldValue,
        _values: &FormValues,
        _meta: Option<&FieldMeta>,
    ) -> Option<ValidationError> {
        if value.is_null() {
            return None;
        }

        let regex = (self.pattern)(self.fraction_length);
        if matches(regex.as_ref(), value) {
            return None;
        }

        Some(ValidationError::number_fraction(
            &self.label,
            value.clone(),
            pattern_source(regex.as_ref()),
            self.fraction_length,
        ))
    }
}

fn matches(pattern: Option<&Regex>, value: &FieldValue) -> bool {
    pattern.is_some_and(|re| re.is_match(&value.to_string()))
}

fn pattern_source(pattern: Option<&Regex>) -> String {
    pattern.map(|re| re.as_str().to_string()).unwrap_or_default()
}
