//! Field-level checks applied to entity DTOs before they are written.
//!
//! A [`FieldChecker`] walks a record's fields in order and records at most one
//! violation per field. Lengths are counted in characters, not bytes.

use std::io::Cursor;

use image::ImageReader;
use validator::{ValidateEmail, ValidateUrl};

use crate::error::CoreError;
use crate::types::DbId;
use crate::upload::is_owner_path;

use super::rules::{FieldViolation, Rule, ValidationErrors};

/// URL schemes accepted for link fields.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Collects violations for one record.
#[derive(Debug, Default)]
pub struct FieldChecker {
    errors: ValidationErrors,
}

impl FieldChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A required text field: must be non-blank and at most `max` characters.
    pub fn required(mut self, field: &'static str, value: &str, max: usize) -> Self {
        if is_blank(value) {
            self.reject(field, Rule::Required);
        } else {
            self.check_length(field, value, max);
        }
        self
    }

    /// A required field on a patch: only checked when the patch sets it.
    pub fn required_if_set(self, field: &'static str, value: Option<&str>, max: usize) -> Self {
        match value {
            Some(v) => self.required(field, v, max),
            None => self,
        }
    }

    /// An optional text field: blank is allowed, length is still bounded.
    pub fn optional(mut self, field: &'static str, value: Option<&str>, max: usize) -> Self {
        if let Some(v) = value {
            self.check_length(field, v, max);
        }
        self
    }

    /// An optional link field. Blank is treated as unset.
    pub fn url(mut self, field: &'static str, value: Option<&str>, max: usize) -> Self {
        let Some(v) = value.filter(|v| !is_blank(v)) else {
            return self;
        };
        if self.check_length(field, v, max) && !is_valid_url(v) {
            self.reject(field, Rule::Url);
        }
        self
    }

    /// An e-mail field. Presence is checked separately with [`required`](Self::required).
    pub fn email(mut self, field: &'static str, value: Option<&str>, max: usize) -> Self {
        let Some(v) = value.filter(|v| !is_blank(v)) else {
            return self;
        };
        if self.errors.contains(field) {
            return self;
        }
        if self.check_length(field, v, max) && !v.validate_email() {
            self.reject(field, Rule::Email);
        }
        self
    }

    /// Uploaded bytes for an image slot: must decode as PNG, JPEG or WebP.
    pub fn image(mut self, field: &'static str, data: &[u8]) -> Self {
        if !is_decodable_image(data) {
            self.reject(field, Rule::Image);
        }
        self
    }

    /// A stored upload path: must sit directly in `owner`'s upload directory.
    pub fn owner_path(
        mut self,
        field: &'static str,
        value: Option<&str>,
        owner: Option<DbId>,
    ) -> Self {
        if let Some(v) = value {
            if !is_owner_path(owner, v) {
                self.reject(field, Rule::OwnerPath);
            }
        }
        self
    }

    /// Violations collected so far.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// `Ok` if every check passed, otherwise every violation collected.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self.errors))
        }
    }

    /// Returns `true` when the value fits.
    fn check_length(&mut self, field: &'static str, value: &str, max: usize) -> bool {
        if char_len(value) > max {
            self.reject(field, Rule::MaxLength { max });
            false
        } else {
            true
        }
    }

    fn reject(&mut self, field: &'static str, rule: Rule) {
        if !self.errors.contains(field) {
            self.errors.push(FieldViolation::new(field, rule));
        }
    }
}

/// Blank means empty after trimming whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Number of characters (Unicode scalar values) in `value`.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Absolute URL with one of [`ALLOWED_URL_SCHEMES`] and a host.
pub fn is_valid_url(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    let scheme_ok = ALLOWED_URL_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme));
    scheme_ok && !rest.is_empty() && value.validate_url()
}

/// Whether `data` carries a readable header for one of the enabled image formats.
pub fn is_decodable_image(data: &[u8]) -> bool {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .is_some()
}
