//! Data model: the constraints document, canonical field types and the
//! values a form field can hold.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "SuperHero": {
//!     "name": {
//!       "javaType": "java.lang.String",
//!       "types": ["text"],
//!       "required": true,
//!       "minimumLength": null,
//!       "maximumLength": 50,
//!       "fractionLength": null,
//!       "radix": null,
//!       "pattern": null,
//!       "min": null,
//!       "max": null,
//!       "name": "name"
//!     }
//!   }
//! }
//! ```

use std::{collections::BTreeMap, collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::Result;

// ═══════════════════════════════════════════════════════════════════════════
// FIELD TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Canonical field type, declared from most to least specific.
///
/// The derived `Ord` follows declaration order, so the smaller of two types is
/// the more specific one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FieldType {
    Enum,
    Boolean,
    Color,
    DatetimeLocal,
    Datetime,
    Month,
    Week,
    Date,
    Time,
    Email,
    Tel,
    Number,
    Url,
    Password,
    File,
    Image,
    Text,
}

impl FieldType {
    /// Every type in specificity order, `Text` last.
    pub const ALL: [Self; 17] = [
        Self::Enum,
        Self::Boolean,
        Self::Color,
        Self::DatetimeLocal,
        Self::Datetime,
        Self::Month,
        Self::Week,
        Self::Date,
        Self::Time,
        Self::Email,
        Self::Tel,
        Self::Number,
        Self::Url,
        Self::Password,
        Self::File,
        Self::Image,
        Self::Text,
    ];
}

// ═══════════════════════════════════════════════════════════════════════════
// CONSTRAINTS DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════

/// Server-declared constraints for one entity property.
///
/// Every limit is optional; `None` means "no constraint of this kind".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConstraint {
    /// Back-end type name, informational only
    pub java_type: Option<String>,
    /// Declared type tags, possibly overlapping (`["email", "text"]`)
    pub types: Option<Vec<String>>,
    pub required: Option<bool>,
    pub minimum_length: Option<u64>,
    pub maximum_length: Option<u64>,
    /// Digits allowed after the decimal point for number fields
    pub fraction_length: Option<u32>,
    /// Passed through, not used for validation
    pub radix: Option<u32>,
    /// Passed through, not used for validation
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Property name this record describes
    pub name: String,
}

impl FieldConstraint {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub const fn with_minimum_length(mut self, minimum_length: u64) -> Self {
        self.minimum_length = Some(minimum_length);
        self
    }

    #[must_use]
    pub const fn with_maximum_length(mut self, maximum_length: u64) -> Self {
        self.maximum_length = Some(maximum_length);
        self
    }

    #[must_use]
    pub const fn with_fraction_length(mut self, fraction_length: u32) -> Self {
        self.fraction_length = Some(fraction_length);
        self
    }

    #[must_use]
    pub const fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub const fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Whether the constraint marks the field as required
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Entity name to property name to [`FieldConstraint`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(HashMap<String, HashMap<String, FieldConstraint>>);

impl Constraints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the JSON document served by the back-end.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Decode an already parsed JSON document.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Add or replace the record for `entity.property`.
    pub fn insert(
        &mut self,
        entity: impl Into<String>,
        property: impl Into<String>,
        constraint: FieldConstraint,
    ) -> Option<FieldConstraint> {
        self.0
            .entry(entity.into())
            .or_default()
            .insert(property.into(), constraint)
    }

    /// Builder-style [`Constraints::insert`].
    #[must_use]
    pub fn with(
        mut self,
        entity: impl Into<String>,
        property: impl Into<String>,
        constraint: FieldConstraint,
    ) -> Self {
        self.insert(entity, property, constraint);
        self
    }

    /// All property records of one entity
    pub fn entity(&self, entity: &str) -> Option<&HashMap<String, FieldConstraint>> {
        self.0.get(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FIELD VALUES
// ═══════════════════════════════════════════════════════════════════════════

/// The value held by a form field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    Date(DateTime<Utc>),
}

impl FieldValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Length of text or of a list; other values have none.
    ///
    /// Text length counts Unicode scalar values, so a character outside the
    /// Basic Multilingual Plane counts once, not as two UTF-16 code units.
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Text(text) => Some(text.chars().count()),
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Numeric reading used by range checks.
    ///
    /// Text is read the way a browser converts form input to a number: blank
    /// text is `0`, a decimal literal (optionally signed, with fraction and
    /// exponent) is its value, and `Infinity` is infinite. Anything else,
    /// including `inf` and `NaN`, has no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(text) => text_number(text),
            _ => None,
        }
    }
}

fn text_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();

    match trimmed {
        "" => Some(0.0),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        literal
            if literal
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')) =>
        {
            literal.parse::<f64>().ok()
        }
        _ => None,
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Self::Date(date) => f.write_str(&date.to_rfc3339()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for FieldValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(date: DateTime<Utc>) -> Self {
        Self::Date(date)
    }
}

impl From<Vec<Self>> for FieldValue {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Self>> for FieldValue {
    fn from(entries: BTreeMap<String, Self>) -> Self {
        Self::Map(entries)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Values of every field in the form, by field name.
pub type FormValues = BTreeMap<String, FieldValue>;

/// Per-field state supplied by the form layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    pub active: bool,
    pub dirty: bool,
    pub touched: bool,
}

impl FieldMeta {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_field_type_tags_round_trip() {
        assert_eq!(FieldType::DatetimeLocal.to_string(), "datetime-local");
        assert_eq!(FieldType::from_str("datetime-local"), Ok(FieldType::DatetimeLocal));
        assert_eq!(FieldType::from_str("email"), Ok(FieldType::Email));
        assert!(FieldType::from_str("java.lang.String").is_err());
    }

    #[test]
    fn test_field_type_order_is_specificity() {
        let mut sorted = FieldType::ALL;
        sorted.sort();
        assert_eq!(sorted, FieldType::ALL);
        assert_eq!(FieldType::ALL.last(), Some(&FieldType::Text));
        assert!(FieldType::Email < FieldType::Text);
        assert!(FieldType::Enum < FieldType::Boolean);
    }

    #[test]
    fn test_constraints_decode_wire_document() {
        let constraints = Constraints::from_json_value(json!({
            "SuperHero": {
                "email": {
                    "javaType": "java.lang.String",
                    "types": ["email", "text"],
                    "required": true,
                    "minimumLength": null,
                    "maximumLength": 255,
                    "fractionLength": null,
                    "radix": null,
                    "pattern": null,
                    "min": null,
                    "max": null,
                    "name": "email"
                }
            }
        }));

        let Ok(constraints) = constraints else {
            unreachable!("document should decode")
        };

        let mut expected = FieldConstraint::new("email")
            .with_types(["email", "text"])
            .with_required(true)
            .with_maximum_length(255);
        expected.java_type = Some("java.lang.String".to_string());

        let email = constraints.entity("SuperHero").and_then(|e| e.get("email"));
        assert_eq!(email, Some(&expected));
    }

    #[test]
    fn test_constraint_absent_fields_are_none() {
        let constraints = Constraints::from_json_str(r#"{"Hero": {"age": {"name": "age"}}}"#);
        let Ok(constraints) = constraints else {
            unreachable!("document should decode")
        };
        let age = constraints.entity("Hero").and_then(|e| e.get("age"));
        assert_eq!(age, Some(&FieldConstraint::new("age")));
        assert!(age.is_some_and(|c| !c.is_required()));
    }

    #[test]
    fn test_constraints_reject_non_object() {
        assert!(Constraints::from_json_str("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_value_length() {
        assert_eq!(FieldValue::from("héllo").length(), Some(5));
        assert_eq!(FieldValue::from("a\u{1F600}b").length(), Some(3));
        assert_eq!(FieldValue::List(vec![FieldValue::Null]).length(), Some(1));
        assert_eq!(FieldValue::from(12).length(), None);
        assert_eq!(FieldValue::Null.length(), None);
    }

    #[test]
    fn test_value_numeric_reading() {
        assert_eq!(FieldValue::from("4").as_number(), Some(4.0));
        assert_eq!(FieldValue::from(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(FieldValue::from(true).as_number(), Some(1.0));
        assert_eq!(FieldValue::from("abc").as_number(), None);
        assert_eq!(FieldValue::List(vec![]).as_number(), None);
    }

    #[test]
    fn test_text_numeric_reading_edges() {
        assert_eq!(FieldValue::from("").as_number(), Some(0.0));
        assert_eq!(FieldValue::from("   ").as_number(), Some(0.0));
        assert_eq!(FieldValue::from("1e3").as_number(), Some(1000.0));
        assert_eq!(FieldValue::from("-.5").as_number(), Some(-0.5));
        assert_eq!(FieldValue::from("Infinity").as_number(), Some(f64::INFINITY));
        assert_eq!(FieldValue::from("-Infinity").as_number(), Some(f64::NEG_INFINITY));

        for rejected in ["inf", "-inf", "infinity", "NaN", "nan", "1_000", "12abc", "--1"] {
            assert_eq!(FieldValue::from(rejected).as_number(), None, "{rejected:?}");
        }
    }

    #[test]
    fn test_value_display() {
        assert_eq!(FieldValue::from(4.0).to_string(), "4");
        assert_eq!(FieldValue::from(-12.3).to_string(), "-12.3");
        assert_eq!(FieldValue::from(false).to_string(), "false");
        assert_eq!(
            FieldValue::List(vec![FieldValue::from(1), FieldValue::from("a")]).to_string(),
            "1,a"
        );
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).single();
        assert_eq!(
            FieldValue::from(date).to_string(),
            "2020-01-02T03:04:05+00:00"
        );
    }

    #[test]
    fn test_value_from_json() {
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from(json!(3)), FieldValue::Number(3.0));
        assert_eq!(
            FieldValue::from(json!({"a": [1]})),
            FieldValue::Map(BTreeMap::from([(
                "a".to_string(),
                FieldValue::List(vec![FieldValue::Number(1.0)])
            )]))
        );
    }

    #[test]
    fn test_value_serializes_plain() {
        let json = serde_json::to_value(FieldValue::from("x"));
        assert_eq!(json.ok(), Some(json!("x")));
        let json = serde_json::to_value(FieldValue::Null);
        assert_eq!(json.ok(), Some(json!(null)));
    }
}
