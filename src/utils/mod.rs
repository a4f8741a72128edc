use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::SiteError;

/// Parse a path id, naming the resource in the error
pub fn parse_id(raw: &str, kind: &str) -> Result<Uuid, SiteError> {
    Uuid::parse_str(raw.trim()).map_err(|_| SiteError::Validation(format!("Invalid {} ID", kind)))
}

/// Current UTC time, used for document timestamps
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Trim a text field, returning `None` when nothing is left
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trim and check a slug: non-empty, no whitespace, no path separators
pub fn normalize_slug(raw: &str) -> Result<String, SiteError> {
    let slug = raw.trim();
    if slug.is_empty() {
        return Err(SiteError::Validation("Slug is required".to_string()));
    }
    if slug.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(SiteError::Validation(format!(
            "Slug '{}' must not contain whitespace or slashes",
            slug
        )));
    }
    Ok(slug.to_string())
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Minimal shape check for contact addresses
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// `looks_like_email` as a validation error naming the address
pub fn check_email(email: &str) -> Result<(), SiteError> {
    if looks_like_email(email) {
        Ok(())
    } else {
        Err(SiteError::Validation(format!("'{}' is not a valid email address", email)))
    }
}
