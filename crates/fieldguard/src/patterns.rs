//! Default numeric patterns
//!
//! Both patterns are replaceable: `number_with` takes any integer regex, and
//! fraction checks take a [`FractionPattern`] generator. A pattern that cannot
//! be built is `None`, and checks against it fail.
//!
//! Digits are ASCII `0-9` only; other Unicode decimal digits are rejected.

use std::sync::{Arc, OnceLock};

use regex::Regex;

/// Builds the fraction regex for a given number of decimals.
///
/// Invoked on every validation, so it may depend on state that changes
/// between calls (a locale's decimal separator, for example).
pub type FractionPattern = Arc<dyn Fn(u32) -> Option<Regex> + Send + Sync>;

/// A positive or negative whole number.
pub fn number_regex() -> Option<&'static Regex> {
    static NUMBER_RE: OnceLock<Option<Regex>> = OnceLock::new();
    NUMBER_RE
        .get_or_init(|| Regex::new(r"^-?[0-9]+$").ok())
        .as_ref()
}

/// A positive or negative number with at most `fraction_length` decimals
/// after a period. Zero decimals means whole numbers only.
pub fn fraction_number_regex(fraction_length: u32) -> Option<Regex> {
    if fraction_length == 0 {
        return number_regex().cloned();
    }

    Regex::new(&format!(r"^-?[0-9]+(\.[0-9]{{1,{fraction_length}}})?$"))
        .map_err(|e| tracing::warn!("Fraction pattern for {fraction_length} decimals rejected: {e}"))
        .ok()
}

/// The default [`FractionPattern`], wrapping [`fraction_number_regex`].
pub fn default_fraction_pattern() -> FractionPattern {
    Arc::new(fraction_number_regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(regex: Option<&Regex>, input: &str) -> bool {
        regex.is_some_and(|re| re.is_match(input))
    }

    #[test]
    fn test_number_regex() {
        let regex = number_regex();
        assert!(regex.is_some());
        assert!(matches(regex, "1"));
        assert!(matches(regex, "-42"));
        assert!(matches(regex, "007"));
        assert!(!matches(regex, "1.5"));
        assert!(!matches(regex, "abc"));
        assert!(!matches(regex, ""));
        assert!(!matches(regex, "- 1"));
        assert!(!matches(regex, "1e5"));
    }

    #[test]
    fn test_fraction_regex_four_decimals() {
        let regex = fraction_number_regex(4);
        let regex = regex.as_ref();
        assert!(matches(regex, "12"));
        assert!(matches(regex, "12.3456"));
        assert!(matches(regex, "-12.3"));
        assert!(!matches(regex, "12.34567"));
        assert!(!matches(regex, "12."));
        assert!(!matches(regex, ".5"));
        assert!(!matches(regex, "12,5"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Arabic-Indic and full-width digits
        assert!(!matches(number_regex(), "\u{0661}\u{0662}"));
        assert!(!matches(number_regex(), "\u{FF11}\u{FF12}"));

        let fraction = fraction_number_regex(2);
        assert!(!matches(fraction.as_ref(), "\u{0661}\u{0662}.\u{0665}"));
        assert!(!matches(fraction.as_ref(), "12.\u{0665}"));
        assert!(matches(fraction.as_ref(), "12.5"));
    }

    #[test]
    fn test_fraction_regex_zero_is_whole_numbers() {
        let regex = fraction_number_regex(0);
        assert!(matches(regex.as_ref(), "12"));
        assert!(!matches(regex.as_ref(), "12.3"));
    }

    #[test]
    fn test_default_generator_matches_function() {
        let pattern = default_fraction_pattern();
        assert_eq!(
            pattern(2).map(|re| re.as_str().to_string()),
            fraction_number_regex(2).map(|re| re.as_str().to_string())
        );
    }
}
