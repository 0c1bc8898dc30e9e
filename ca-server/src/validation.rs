//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! handlers before anything reaches the database.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Names and titles: banner, member, project, product, goal, item
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and notice bodies
pub const MAX_NOTE_LEN: usize = 5000;

/// Short labels: role, area, board term, contact, banner slot
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Links
pub const MAX_URL_LEN: usize = 2048;

/// Tags on a product
pub const MAX_TAGS: usize = 50;

/// Money columns are NUMERIC(14,2): amounts stay below 10^12
pub const MAX_AMOUNT_EXCLUSIVE: i64 = 1_000_000_000_000;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Unwrap a field that must be present and non-blank.
pub fn require_text<'a>(
    value: &'a Option<String>,
    field: &str,
    max_len: usize,
) -> Result<&'a str, AppError> {
    let v = value.as_deref().ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    })?;
    validate_required_text(v, field, max_len)?;
    Ok(v)
}

/// Unwrap any field that must be present.
pub fn require<T: Copy>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    })
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Money amounts must be strictly positive, below [`MAX_AMOUNT_EXCLUSIVE`],
/// with at most two decimals.
pub fn validate_amount(value: Decimal, field: &str) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be greater than zero"),
        )
        .with_detail("field", field));
    }
    if value >= Decimal::from(MAX_AMOUNT_EXCLUSIVE) {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be less than {MAX_AMOUNT_EXCLUSIVE}"),
        )
        .with_detail("field", field));
    }
    if value.normalize().scale() > 2 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must have at most two decimal places"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Project progress is a percentage.
pub fn validate_progress(value: i32) -> Result<(), AppError> {
    if !(0..=100).contains(&value) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "progresso must be between 0 and 100",
        )
        .with_detail("field", "progresso"));
    }
    Ok(())
}

/// Prices are whole cents and never negative.
pub fn validate_price(cents: i64) -> Result<(), AppError> {
    if cents < 0 {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", "preco"));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "quantidade must not be negative",
        )
        .with_detail("field", "quantidade"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text() {
        assert!(validate_required_text("Banner", "titulo", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "titulo", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "titulo", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let accented = "é".repeat(MAX_SHORT_TEXT_LEN);
        assert!(validate_required_text(&accented, "cargo", MAX_SHORT_TEXT_LEN).is_ok());
    }

    #[test]
    fn require_text_reports_missing_field() {
        let err = require_text(&None, "nome", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.details.unwrap()["field"], "nome");

        let value = Some("Ana".to_string());
        assert_eq!(require_text(&value, "nome", MAX_NAME_LEN).unwrap(), "Ana");
    }

    #[test]
    fn optional_text() {
        assert!(validate_optional_text(&None, "link", MAX_URL_LEN).is_ok());
        let long = Some("x".repeat(MAX_URL_LEN + 1));
        assert!(validate_optional_text(&long, "link", MAX_URL_LEN).is_err());
    }

    #[test]
    fn amounts() {
        assert!(validate_amount(Decimal::new(1050, 2), "valor").is_ok());
        assert!(validate_amount(Decimal::new(10500, 3), "valor").is_ok()); // 10.500
        assert!(validate_amount(Decimal::new(10501, 3), "valor").is_err());
        let err = validate_amount(Decimal::ZERO, "valor").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
        assert!(validate_amount(Decimal::from(-5), "valor").is_err());
    }

    #[test]
    fn amounts_fit_the_money_column() {
        // 999 999 999 999.99 is the largest NUMERIC(14,2)
        assert!(validate_amount(Decimal::new(99_999_999_999_999, 2), "valor").is_ok());
        let err = validate_amount(Decimal::from(MAX_AMOUNT_EXCLUSIVE), "valor").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
        assert!(validate_amount(Decimal::from(i64::MAX), "valor").is_err());
    }

    #[test]
    fn progress_bounds() {
        assert!(validate_progress(0).is_ok());
        assert!(validate_progress(100).is_ok());
        assert!(validate_progress(101).is_err());
        assert!(validate_progress(-1).is_err());
    }

    #[test]
    fn price_and_quantity() {
        assert!(validate_price(0).is_ok());
        assert_eq!(
            validate_price(-1).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
        assert!(validate_quantity(-1).is_err());
    }
}
