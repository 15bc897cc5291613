//! Input validation utilities

use std::sync::OnceLock;

use chrono::NaiveDate;
use common::models::non_blank;
use regex::Regex;

use crate::error::{ApiError, ApiResult};

/// Trimmed value of a required field
pub fn required(label: &str, value: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value of an optional field; blank means absent
pub fn optional(value: &str) -> Option<String> {
    non_blank(Some(value.to_string()))
}

/// Parse a `YYYY-MM-DD` date
pub fn iso_date(label: &str, value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("{label} must be a date in YYYY-MM-DD format")))
}

/// Parse an optional `YYYY-MM-DD` date; blank means absent
pub fn optional_iso_date(label: &str, value: &str) -> ApiResult<Option<NaiveDate>> {
    optional(value).map(|v| iso_date(label, &v)).transpose()
}

/// Validate email
pub fn email(value: &str) -> ApiResult<()> {
    if value.len() > 254 {
        return Err(ApiError::Validation(
            "Email must be at most 254 characters long".to_string(),
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(value) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}
