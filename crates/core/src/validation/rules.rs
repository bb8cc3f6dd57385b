//! Validation rule and result types.

use std::fmt;

use serde::Serialize;

/// The constraint a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Rule {
    /// The field must be present and non-blank.
    Required,
    /// The field holds more than `max` characters.
    MaxLength { max: usize },
    /// The field is not an absolute http(s)/ftp(s) URL.
    Url,
    /// The field is not a well-formed e-mail address.
    Email,
    /// The uploaded bytes are not a decodable PNG, JPEG or WebP image.
    Image,
    /// The stored path lies outside the owner's upload directory.
    OwnerPath,
}

impl Rule {
    /// Stable machine-readable code for the rule.
    pub fn code(self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MaxLength { .. } => "max_length",
            Rule::Url => "url",
            Rule::Email => "email",
            Rule::Image => "image",
            Rule::OwnerPath => "owner_path",
        }
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        let message = match rule {
            Rule::Required => format!("{field} is required"),
            Rule::MaxLength { max } => {
                format!("{field} exceeds maximum length of {max} characters")
            }
            Rule::Url => format!("{field} must be a valid URL"),
            Rule::Email => format!("{field} must be a valid e-mail address"),
            Rule::Image => format!("{field} must be a PNG, JPEG or WebP image"),
            Rule::OwnerPath => format!("{field} must be stored in the owner's upload directory"),
        };
        Self {
            field,
            rule,
            message,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every violation collected while validating one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Names of the offending fields, in the order they were checked.
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    /// The violation recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
