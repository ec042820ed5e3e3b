//! Request field validation shared by the components.

use crate::error::AppError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

pub struct RequestValidator;

impl RequestValidator {
    /// Field must be present and not blank. Returns the trimmed value.
    pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
        let v = value.trim();
        if v.is_empty() {
            return Err(AppError::Validation(format!("{} is required", field)));
        }
        Ok(v)
    }

    pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
        if value.chars().count() > max {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
        Ok(())
    }

    pub fn min_length(field: &str, value: &str, min: usize) -> Result<(), AppError> {
        if value.chars().count() < min {
            return Err(AppError::Validation(format!(
                "{} must be at least {} characters",
                field, min
            )));
        }
        Ok(())
    }

    pub fn email(field: &str, value: &str) -> Result<(), AppError> {
        if !EMAIL_RE.is_match(value) {
            return Err(AppError::Validation(format!("{} must be a valid email", field)));
        }
        Ok(())
    }

    /// Required, bounded string. Returns the trimmed value.
    pub fn required_max<'a>(field: &str, value: &'a str, max: usize) -> Result<&'a str, AppError> {
        let v = Self::required(field, value)?;
        Self::max_length(field, v, max)?;
        Ok(v)
    }
}

/// `Some(trimmed)` when the value has content, else `None`.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
