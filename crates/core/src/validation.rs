//! Declarative field validation.
//!
//! A [`Schema`] lists form fields in display order, each with the rules it
//! must satisfy. Validating a [`FieldSource`] runs every field and keeps the
//! message of the first rule each field fails, so the form can show one
//! inline error per field.
//!
//! ```
//! use onboarding_core::validation::{Rule, Schema};
//! use std::collections::HashMap;
//!
//! let schema = Schema::new()
//!     .field("name", [Rule::min_chars(2, "Name must be at least 2 characters")])
//!     .field("email", [Rule::email("Invalid email address")]);
//!
//! let mut values = HashMap::new();
//! values.insert("name".to_string(), "A".to_string());
//! values.insert("email".to_string(), "owner@cafe.in".to_string());
//!
//! let errors = schema.validate(&values).unwrap_err();
//! assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
//! assert_eq!(errors.get("email"), None);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use regex::Regex;

use crate::types::{Email, HexColor, PhoneNumber, PhoneRules};

/// Anything that can produce a string value for a field name.
///
/// Missing fields validate as the empty string.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSource for [(&str, &str)] {
    fn field(&self, name: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

impl<const N: usize> FieldSource for [(&str, &str); N] {
    fn field(&self, name: &str) -> Option<&str> {
        self.as_slice().field(name)
    }
}

/// A single validation rule with the message shown when it fails.
#[derive(Debug, Clone)]
pub enum Rule {
    /// At least `min` characters (Unicode scalar values).
    MinChars { min: usize, message: String },
    /// Non-empty after trimming.
    Required { message: String },
    /// Parses as an [`Email`].
    Email { message: String },
    /// Parses as a [`PhoneNumber`] under the given bounds.
    Phone { rules: PhoneRules, message: String },
    /// Parses as a [`HexColor`].
    HexColor { message: String },
    /// Matches a regular expression.
    Pattern { regex: Regex, message: String },
    /// Equals one of a fixed set of values, ignoring ASCII case.
    OneOf {
        values: &'static [&'static str],
        message: String,
    },
    /// Applies the inner rule only when the value is non-empty.
    Optional(Box<Rule>),
}

impl Rule {
    pub fn min_chars(min: usize, message: impl Into<String>) -> Self {
        Self::MinChars {
            min,
            message: message.into(),
        }
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    pub fn phone(rules: PhoneRules, message: impl Into<String>) -> Self {
        Self::Phone {
            rules,
            message: message.into(),
        }
    }

    pub fn hex_color(message: impl Into<String>) -> Self {
        Self::HexColor {
            message: message.into(),
        }
    }

    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        Self::Pattern {
            regex,
            message: message.into(),
        }
    }

    pub fn one_of(values: &'static [&'static str], message: impl Into<String>) -> Self {
        Self::OneOf {
            values,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    /// Check a value, returning the failure message.
    ///
    /// # Errors
    ///
    /// Returns the rule's message when `value` does not satisfy it.
    pub fn check(&self, value: &str) -> Result<(), &str> {
        let ok = match self {
            Self::MinChars { min, .. } => value.chars().count() >= *min,
            Self::Required { .. } => !value.trim().is_empty(),
            Self::Email { .. } => Email::parse(value).is_ok(),
            Self::Phone { rules, .. } => PhoneNumber::parse(value, *rules).is_ok(),
            Self::HexColor { .. } => HexColor::parse(value).is_ok(),
            Self::Pattern { regex, .. } => regex.is_match(value),
            Self::OneOf { values, .. } => values.iter().any(|v| v.eq_ignore_ascii_case(value)),
            Self::Optional(inner) => {
                return if value.trim().is_empty() {
                    Ok(())
                } else {
                    inner.check(value)
                };
            }
        };

        if ok { Ok(()) } else { Err(self.message()) }
    }

    fn message(&self) -> &str {
        match self {
            Self::MinChars { message, .. }
            | Self::Required { message }
            | Self::Email { message }
            | Self::Phone { message, .. }
            | Self::HexColor { message }
            | Self::Pattern { message, .. }
            | Self::OneOf { message, .. } => message,
            Self::Optional(inner) => inner.message(),
        }
    }
}

/// An ordered set of field rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Vec<Rule>)>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with its rules. Rules are checked in order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name.into(), rules.into_iter().collect()));
        self
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first failure message of each invalid field.
    pub fn validate<S: FieldSource + ?Sized>(&self, source: &S) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for (name, rules) in &self.fields {
            let value = source.field(name).unwrap_or("");
            if let Some(message) = rules.iter().find_map(|rule| rule.check(value).err()) {
                errors.insert(name.clone(), message);
            }
        }
        errors.into_result()
    }
}

/// Per-field error messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. The first error recorded for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contact_schema() -> Schema {
        Schema::new()
            .field("name", [Rule::min_chars(2, "Name must be at least 2 characters")])
            .field("email", [Rule::email("Invalid email address")])
            .field(
                "phoneNumber",
                [Rule::phone(PhoneRules::MERCHANT, "Invalid phone number")],
            )
    }

    #[test]
    fn test_valid_source_passes() {
        let values = [
            ("name", "Chai Point"),
            ("email", "owner@chaipoint.in"),
            ("phoneNumber", "+919876543210"),
        ];
        assert!(contact_schema().validate(&values).is_ok());
    }

    #[test]
    fn test_collects_one_error_per_field() {
        let values = [("name", "C"), ("email", "not-an-email"), ("phoneNumber", "123")];
        let errors = contact_schema().validate(&values).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(errors.get("phoneNumber"), Some("Invalid phone number"));
    }

    #[test]
    fn test_missing_fields_validate_as_empty() {
        let values: [(&str, &str); 0] = [];
        let errors = contact_schema().validate(&values).unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let schema = Schema::new().field(
            "address",
            [
                Rule::required("Address is required"),
                Rule::min_chars(10, "Please enter complete address"),
            ],
        );
        let errors = schema.validate(&[("address", "")]).unwrap_err();
        assert_eq!(errors.get("address"), Some("Address is required"));

        let errors = schema.validate(&[("address", "MG Rd")]).unwrap_err();
        assert_eq!(errors.get("address"), Some("Please enter complete address"));
    }

    #[test]
    fn test_min_chars_counts_characters_not_bytes() {
        let rule = Rule::min_chars(2, "too short");
        assert!(rule.check("ಕಾ").is_ok());
        assert_eq!(rule.check("ಕ"), Err("too short"));
    }

    #[test]
    fn test_optional_skips_blank_values() {
        let pincode = Rule::pattern(Regex::new(r"^[1-9][0-9]{5}$").unwrap(), "Invalid pincode")
            .optional();
        assert!(pincode.check("").is_ok());
        assert!(pincode.check("   ").is_ok());
        assert!(pincode.check("560001").is_ok());
        assert_eq!(pincode.check("056000"), Err("Invalid pincode"));
    }

    #[test]
    fn test_one_of_ignores_case() {
        const DAYS: &[&str] = &["Monday", "Tuesday"];
        let rule = Rule::one_of(DAYS, "Unknown day");
        assert!(rule.check("monday").is_ok());
        assert_eq!(rule.check("Sunday"), Err("Unknown day"));
    }

    #[test]
    fn test_field_errors_first_insert_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "first");
        errors.insert("email", "second");
        assert_eq!(errors.get("email"), Some("first"));

        errors.insert("phone", "bad");
        assert_eq!(errors.get("phone"), Some("bad"));
        assert_eq!(errors.to_string(), "email: first; phone: bad");
    }
}
