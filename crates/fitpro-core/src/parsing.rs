// ABOUTME: Lenient numeric parsing for user-entered text fields
// ABOUTME: Validates format, rejects negatives by default, and clamps to optional bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use regex::Regex;
use std::sync::LazyLock;

/// Accepted numeric shape after trimming and comma removal
static NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^-?\d*\.?\d+$").ok());

/// Options for [`safe_parse_number`]
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Value returned for empty or malformed input
    pub default_value: f64,
    /// Lower clamp bound
    pub min: Option<f64>,
    /// Upper clamp bound
    pub max: Option<f64>,
    /// Truncate to an integer
    pub integer: bool,
    /// Accept negative values instead of returning the default
    pub allow_negative: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_value: 0.0,
            min: None,
            max: None,
            integer: false,
            allow_negative: false,
        }
    }
}

impl ParseOptions {
    /// Options with a custom default and nothing else
    #[must_use]
    pub fn with_default(default_value: f64) -> Self {
        Self {
            default_value,
            ..Self::default()
        }
    }

    /// Clamp results to `[min, max]`
    #[must_use]
    pub const fn clamped(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Parse as an integer
    #[must_use]
    pub const fn integer(mut self) -> Self {
        self.integer = true;
        self
    }
}

/// Convert user-entered text to a number without ever failing
///
/// Whitespace is trimmed and every `,` is removed before validation, so `"1,250"`
/// parses as `1250`. Input that does not look like a plain decimal number yields
/// `default_value`, as do negative values unless `allow_negative` is set. Bounds
/// clamp rather than reject.
#[must_use]
pub fn safe_parse_number(value: &str, options: ParseOptions) -> f64 {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return options.default_value;
    }

    let matches = NUMBER_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&cleaned));
    if !matches {
        return options.default_value;
    }

    let parsed = if options.integer {
        integer_prefix(&cleaned).parse::<i64>().map(|n| n as f64).ok()
    } else {
        cleaned.parse::<f64>().ok()
    };

    let Some(num) = parsed.filter(|n| n.is_finite()) else {
        return options.default_value;
    };

    if !options.allow_negative && num < 0.0 {
        return options.default_value;
    }

    if let Some(min) = options.min {
        if num < min {
            return min;
        }
    }
    if let Some(max) = options.max {
        if num > max {
            return max;
        }
    }

    num
}

/// Leading integer portion of an already validated number (`"12.7"` -> `"12"`)
fn integer_prefix(cleaned: &str) -> &str {
    let end = cleaned.find('.').unwrap_or(cleaned.len());
    match &cleaned[..end] {
        "" => "0",
        "-" => "-0",
        prefix => prefix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert!((safe_parse_number("72.5", ParseOptions::default()) - 72.5).abs() < f64::EPSILON);
        assert!((safe_parse_number("  180 ", ParseOptions::default()) - 180.0).abs() < f64::EPSILON);
        assert!((safe_parse_number(".5", ParseOptions::default()) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_commas_are_stripped() {
        let parsed = safe_parse_number("1,250", ParseOptions::default());
        assert!((parsed - 1250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_input_returns_default() {
        let opts = ParseOptions::with_default(100.0);
        assert!((safe_parse_number("", opts) - 100.0).abs() < f64::EPSILON);
        assert!((safe_parse_number("abc", opts) - 100.0).abs() < f64::EPSILON);
        assert!((safe_parse_number("1.2.3", opts) - 100.0).abs() < f64::EPSILON);
        assert!((safe_parse_number("5.", opts) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_handling() {
        assert!(safe_parse_number("-4", ParseOptions::default()).abs() < f64::EPSILON);
        let opts = ParseOptions {
            allow_negative: true,
            ..ParseOptions::default()
        };
        assert!((safe_parse_number("-4", opts) + 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamping_and_integer() {
        let opts = ParseOptions::default().clamped(10.0, 20.0);
        assert!((safe_parse_number("5", opts) - 10.0).abs() < f64::EPSILON);
        assert!((safe_parse_number("50", opts) - 20.0).abs() < f64::EPSILON);

        let int = ParseOptions::default().integer();
        assert!((safe_parse_number("12.9", int) - 12.0).abs() < f64::EPSILON);
        assert!(safe_parse_number(".9", int).abs() < f64::EPSILON);
    }
}
