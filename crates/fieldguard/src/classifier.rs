//! Reduce declared type tags to the single most specific [`FieldType`].
//!
//! Back-ends often list overlapping hints such as `["email", "text"]`; the
//! form needs exactly one type to render and validate against.

use crate::model::FieldType;

/// Most specific canonical type among `types`, `Text` when none is recognised.
///
/// Unknown tags are ignored. `None` and an empty list both yield `Text`.
pub fn classify(types: Option<&[String]>) -> FieldType {
    types
        .unwrap_or_default()
        .iter()
        .filter_map(|tag| tag.parse::<FieldType>().ok())
        .fold(FieldType::Text, Ord::min)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_missing_or_empty_is_text() {
        assert_eq!(classify(None), FieldType::Text);
        assert_eq!(classify(Some([].as_slice())), FieldType::Text);
    }

    #[test]
    fn test_most_specific_wins() {
        assert_eq!(classify(Some(tags(&["email", "text"]).as_slice())), FieldType::Email);
        assert_eq!(classify(Some(tags(&["text", "email"]).as_slice())), FieldType::Email);
        assert_eq!(classify(Some(tags(&["number", "date"]).as_slice())), FieldType::Date);
        assert_eq!(classify(Some(tags(&["boolean"]).as_slice())), FieldType::Boolean);
        assert_eq!(classify(Some(tags(&["text", "enum"]).as_slice())), FieldType::Enum);
        assert_eq!(
            classify(Some(tags(&["datetime", "datetime-local"]).as_slice())),
            FieldType::DatetimeLocal
        );
    }

    #[test]
    fn test_unknown_tags_ignored() {
        assert_eq!(classify(Some(tags(&["java.lang.String"]).as_slice())), FieldType::Text);
        assert_eq!(
            classify(Some(tags(&["decimal", "number", "number"]).as_slice())),
            FieldType::Number
        );
    }

    fn any_tag() -> impl Strategy<Value = String> {
        prop_oneof![
            proptest::sample::select(FieldType::ALL.to_vec()).prop_map(|t| t.to_string()),
            "[a-z-]{0,12}",
        ]
    }

    proptest! {
        /// Property: the result never comes after any recognised input tag
        #[test]
        fn prop_classify_is_minimum(types in proptest::collection::vec(any_tag(), 0..8)) {
            let result = classify(Some(types.as_slice()));
            prop_assert!(FieldType::ALL.contains(&result));

            for tag in &types {
                if let Ok(parsed) = tag.parse::<FieldType>() {
                    prop_assert!(result <= parsed);
                }
            }
        }

        /// Property: input order does not matter
        #[test]
        fn prop_classify_order_independent(types in proptest::collection::vec(any_tag(), 0..8)) {
            let mut reversed = types.clone();
            reversed.reverse();
            prop_assert_eq!(classify(Some(types.as_slice())), classify(Some(reversed.as_slice())));
        }
    }
}
