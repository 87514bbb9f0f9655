//! Input validation utilities

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::{error::ApiError, models::Category};

/// Trimmed value of a required text field
pub fn required(value: Option<&str>, message: &str) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::Validation(message.to_string())),
    }
}

/// Trimmed value of an optional text field; blank counts as absent
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Canonical form of an email: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.len() > 254 {
        return Err(ApiError::Validation(
            "Email must be at most 254 characters long".to_string(),
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Parse the `sizes` form field, which carries a JSON-encoded array
///
/// Numeric entries are kept as their decimal text, so `[38, "39"]` becomes
/// `["38", "39"]`.
pub fn parse_sizes(raw: Option<&str>) -> Result<Vec<String>, ApiError> {
    let invalid = || ApiError::Validation("Sizes must be a valid JSON array".to_string());

    let value: Value = serde_json::from_str(raw.ok_or_else(invalid)?).map_err(|_| invalid())?;
    let Value::Array(entries) = value else {
        return Err(ApiError::Validation("Sizes must be an array".to_string()));
    };

    let sizes = entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(ApiError::Validation(
                "Sizes must contain only strings or numbers".to_string(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if sizes.is_empty() {
        return Err(ApiError::Validation("Sizes must not be empty".to_string()));
    }

    Ok(sizes)
}

/// Parse a required, finite, non-negative price
pub fn parse_price(raw: Option<&str>) -> Result<f64, ApiError> {
    let raw = required(raw, "Price is required")?;
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ApiError::Validation(
            "Price must be a non-negative number".to_string(),
        )),
    }
}

/// Parse a required product category
pub fn parse_category(raw: Option<&str>) -> Result<Category, ApiError> {
    required(raw, "Category is required")?
        .parse()
        .map_err(|_| ApiError::Validation("Category must be one of: clothing, shoes".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::Validation(msg) => msg,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(Some("  A "), "Name is required").unwrap(), "A");
        assert_eq!(
            message(required(Some("   "), "Name is required").unwrap_err()),
            "Name is required"
        );
        assert!(required(None, "Name is required").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last+tag@shop.example").is_ok());
        assert!(validate_email("a@x").is_err());
        assert!(validate_email("not an email").is_err());
    }

    #[test]
    fn test_parse_sizes() {
        assert_eq!(
            parse_sizes(Some(r#"["S","M","L"]"#)).unwrap(),
            vec!["S", "M", "L"]
        );
        assert_eq!(parse_sizes(Some("[38, 39.5]")).unwrap(), vec!["38", "39.5"]);
    }

    #[test]
    fn test_parse_sizes_errors() {
        assert_eq!(
            message(parse_sizes(None).unwrap_err()),
            "Sizes must be a valid JSON array"
        );
        assert_eq!(
            message(parse_sizes(Some("S,M")).unwrap_err()),
            "Sizes must be a valid JSON array"
        );
        assert_eq!(
            message(parse_sizes(Some(r#""S""#)).unwrap_err()),
            "Sizes must be an array"
        );
        assert_eq!(
            message(parse_sizes(Some("[]")).unwrap_err()),
            "Sizes must not be empty"
        );
        assert!(parse_sizes(Some(r#"[{"size":"M"}]"#)).is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(Some("19.99")).unwrap(), 19.99);
        assert_eq!(parse_price(Some("0")).unwrap(), 0.0);
        assert!(parse_price(Some("-1")).is_err());
        assert!(parse_price(Some("NaN")).is_err());
        assert!(parse_price(Some("cheap")).is_err());
        assert!(parse_price(None).is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(Some("shoes")).unwrap(), Category::Shoes);
        assert!(parse_category(Some("hats")).is_err());
        assert!(parse_category(None).is_err());
    }
}
