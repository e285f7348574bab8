/// A write was rejected because one field broke its constraint.
///
/// `field` uses the JSON name of the offending field (`slug`, `mrp`,
/// `variants.colors[1].type`, ...).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_slug(slug: &str) -> Self {
        Self::new("slug", format!("Product slug '{}' already exists", slug))
    }
}

/// Slugs are stored trimmed and lowercased; lookups go through the same path.
pub fn normalize_slug(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn required_text(
    field: &str,
    value: Option<String>,
    message: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn required_number(
    field: &str,
    value: Option<f64>,
    message: &str,
) -> Result<f64, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::new(field, message))?;
    if !value.is_finite() {
        return Err(ValidationError::new(field, "Value must be a finite number"));
    }
    Ok(value)
}

pub(crate) fn at_least(
    field: &str,
    value: f64,
    min: f64,
    message: &str,
) -> Result<f64, ValidationError> {
    if value < min {
        return Err(ValidationError::new(field, message));
    }
    Ok(value)
}

pub(crate) fn at_most(
    field: &str,
    value: f64,
    max: f64,
    message: &str,
) -> Result<f64, ValidationError> {
    if value > max {
        return Err(ValidationError::new(field, message));
    }
    Ok(value)
}
