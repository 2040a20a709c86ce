//! Input checks shared by the services.

use validator::ValidateEmail;

use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;

/// Trim a required text field, rejecting blanks.
pub(crate) fn required(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blanks become `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalize and check an email address.
pub(crate) fn email(value: &str) -> AppResult<String> {
    let normalized = value.trim().to_lowercase();
    if !normalized.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }
    Ok(normalized)
}

/// Check a coordinate pair.
pub(crate) fn coordinates(latitude: f64, longitude: f64) -> AppResult<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::validation("Latitude must be between -90 and 90"));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::validation("Longitude must be between -180 and 180"));
    }
    Ok(())
}

/// Parse an optional coordinate sent as form text.
pub(crate) fn parse_coordinate(value: Option<&str>, field: &str) -> AppResult<Option<f64>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("{field} must be a number"))),
    }
}
