// src/validation.rs

//! Field-level validation helpers
//!
//! Validation never stops at the first problem: every check records its
//! message against the offending field and the caller turns the collected
//! [`FieldErrors`] into a single error.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Key used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Largest value a small positive integer column may hold
pub const MAX_SMALL_POSITIVE: i64 = 32767;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("valid color regex")
});

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(())` when nothing was recorded, the collected errors otherwise
    pub fn into_result(self) -> crate::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::Validation(self))
        }
    }

    /// Require a non-blank string of at most `max` characters
    pub fn check_text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
        } else if value.chars().count() > max {
            self.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
    }

    /// Require `1 <= value <= MAX_SMALL_POSITIVE`
    pub fn check_small_positive(&mut self, field: &str, value: i64, message: &str) {
        if !(1..=MAX_SMALL_POSITIVE).contains(&value) {
            self.add(field, message);
        }
    }

    pub fn check_email(&mut self, field: &str, value: &str) {
        if !EMAIL_RE.is_match(value) {
            self.add(field, "Enter a valid email address.");
        }
    }

    pub fn check_username(&mut self, field: &str, value: &str) {
        if !USERNAME_RE.is_match(value) {
            self.add(
                field,
                "Enter a valid username. Letters, digits and @/./+/-/_ only.",
            );
        }
    }

    pub fn check_slug(&mut self, field: &str, value: &str) {
        if !SLUG_RE.is_match(value) {
            self.add(
                field,
                "Enter a valid slug of letters, numbers, underscores or hyphens.",
            );
        }
    }

    pub fn check_hex_color(&mut self, field: &str, value: &str) {
        if !HEX_COLOR_RE.is_match(value) {
            self.add(field, "Enter a valid HEX color, e.g. #E26C2D.");
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
