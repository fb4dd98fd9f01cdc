//! # Validation Module
//!
//! Input rules for the admin panel forms.
//!
//! ## Text-first inputs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every admin input arrives as the text the operator typed:              │
//! │                                                                         │
//! │    price cell  "12000"   → 12000                                        │
//! │                "12.000"  → 12      (leading integer, like the old UI)   │
//! │                "abc"     → none    (no change / invalid)                │
//! │                                                                         │
//! │    name cell   "  "      → rejected (blank after trim)                  │
//! │                " Fresas" → stored as typed                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};

/// Longest name accepted for a product or topping.
pub const MAX_NAME_LENGTH: usize = 100;

/// Parses the leading base-10 integer of `text`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Returns `None` when no digit is found or the value does
/// not fit in an `i64`.
///
/// ```rust
/// use rose_core::validation::parse_leading_int;
/// assert_eq!(parse_leading_int(" 1500"), Some(1500));
/// assert_eq!(parse_leading_int("12abc"), Some(12));
/// assert_eq!(parse_leading_int("-5"), Some(-5));
/// assert_eq!(parse_leading_int("abc"), None);
/// ```
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Validates a catalog item name.
///
/// The name is returned exactly as given; only blankness and length are
/// checked.
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(name)
}

/// Parses and validates a price typed into a form.
pub fn validate_price_text(text: &str) -> Result<i64, ValidationError> {
    let price = parse_leading_int(text).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: format!("'{}' is not a number", text),
    })?;
    if price < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(price)
}

/// Validates the creation dialog: both fields are required.
///
/// A missing or empty field is [`CoreError::MissingData`] ("Faltan datos"),
/// the message the admin dialog shows.
pub fn validate_new_item(name: Option<&str>, price_text: Option<&str>) -> CoreResult<(String, i64)> {
    let (name, price_text) = match (name, price_text) {
        (Some(n), Some(p)) if !n.is_empty() && !p.is_empty() => (n, p),
        _ => return Err(CoreError::MissingData),
    };

    let name = validate_name(name)?;
    let price = validate_price_text(price_text)?;
    Ok((name.to_string(), price))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("0"), Some(0));
        assert_eq!(parse_leading_int("  42  "), Some(42));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("12.000"), Some(12));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("x12"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Fresas").is_ok());
        assert_eq!(validate_name(" Fresas ").unwrap(), " Fresas ");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_price_text() {
        assert_eq!(validate_price_text("1500").unwrap(), 1500);
        assert!(matches!(
            validate_price_text("-1"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_price_text("gratis"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_new_item_missing_data() {
        assert!(matches!(validate_new_item(None, Some("100")), Err(CoreError::MissingData)));
        assert!(matches!(validate_new_item(Some("Oreo"), Some("")), Err(CoreError::MissingData)));
        assert!(matches!(validate_new_item(Some(""), None), Err(CoreError::MissingData)));

        let (name, price) = validate_new_item(Some("Oreo"), Some("1200")).unwrap();
        assert_eq!(name, "Oreo");
        assert_eq!(price, 1200);
    }
}
