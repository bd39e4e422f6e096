use crate::error::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ()-]{6,18}[0-9]$").expect("valid phone regex"));

/// DECIMAL(10,2) 能存下的最大金额 99999999.99 (尾数 9_999_999_999 = 2 * 2^32 + 1_410_065_407)
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// 单个明细的最大数量
pub const MAX_ITEM_QUANTITY: i32 = 999;

/// 金额比较容差 (0.01)
pub fn money_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= money_tolerance()
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !EMAIL_REGEX.is_match(email) {
        return Err(AppError::ValidationError(
            "Please provide a valid email address".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> AppResult<()> {
    if !PHONE_REGEX.is_match(phone) {
        return Err(AppError::ValidationError(
            "Please provide a valid phone number".to_string(),
        ));
    }
    Ok(())
}

/// 非空且不超过 max 个字符
pub fn validate_required(field: &str, value: &str, max: usize) -> AppResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_non_negative(field: &str, value: Decimal) -> AppResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::ValidationError(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(())
}

/// 金额: 非负, 最多两位小数, 不超过 MAX_MONEY
pub fn validate_money(field: &str, value: Decimal) -> AppResult<()> {
    validate_non_negative(field, value)?;
    if value.normalize().scale() > 2 {
        return Err(AppError::ValidationError(format!(
            "{field} must have at most 2 decimal places"
        )));
    }
    if value > MAX_MONEY {
        return Err(AppError::ValidationError(format!(
            "{field} must not exceed {MAX_MONEY}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane.doe+food@mail.example.org").is_ok());
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
        assert!(validate_phone("5551234567").is_ok());
        assert!(validate_phone("12ab").is_err());
    }

    #[test]
    fn test_amounts_match_within_a_cent() {
        let a = Decimal::new(3745, 2);
        assert!(amounts_match(a, Decimal::new(3746, 2)));
        assert!(!amounts_match(a, Decimal::new(3747, 2)));
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "  ", 10).is_err());
        assert!(validate_required("name", "Pizza Place", 5).is_err());
        assert!(validate_required("name", "Pizza", 5).is_ok());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("fee", Decimal::ZERO).is_ok());
        assert!(validate_non_negative("fee", Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money("price", Decimal::new(1299, 2)).is_ok());
        assert!(validate_money("price", Decimal::new(35000, 3)).is_ok());
        assert_eq!(MAX_MONEY.to_string(), "99999999.99");
        assert!(validate_money("price", MAX_MONEY).is_ok());
        assert!(validate_money("price", Decimal::new(1005, 3)).is_err());
        assert!(validate_money("price", MAX_MONEY + Decimal::new(1, 2)).is_err());
        assert!(validate_money("price", Decimal::MAX).is_err());
        assert!(validate_money("price", Decimal::new(-1, 2)).is_err());
    }
}
