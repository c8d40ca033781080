//! Field-level validation shared by the repositories.
//!
//! Every check returns [`LedgerError::Validation`] naming the offending field,
//! so a caller can report all problems the same way regardless of entity.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};

/// Maximum length of lookup names (property types, lease types, ...).
pub const LOOKUP_NAME_MAX: usize = 50;
pub const PROPERTY_NAME_MAX: usize = 255;
pub const PROPERTY_NUMBER_MAX: usize = 50;
pub const CREATED_BY_MAX: usize = 255;
pub const TENANT_NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 254;
pub const PHONE_MAX: usize = 20;
pub const PASSWORD_MAX: usize = 128;
pub const NO_KTP_MAX: usize = 255;
pub const IMAGE_REF_MAX: usize = 255;
pub const USERNAME_MAX: usize = 150;

/// Digits and scale of the property price and transaction amount columns.
pub const LEDGER_MONEY: (u32, u32) = (30, 2);
/// Digits and scale of the per-category bill price columns.
pub const BILL_MONEY: (u32, u32) = (10, 2);
/// Digits and scale of the tax percent column.
pub const PERCENT: (u32, u32) = (5, 2);

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .unwrap_or_else(|_| unreachable!("email pattern is a valid regex"))
    })
}

/// Trims `value` and rejects it when empty or longer than `max` characters.
pub fn text(field: &'static str, value: &str, max: usize) -> LedgerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "is required"));
    }
    max_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Rejects `value` when longer than `max` characters.
pub fn max_len(field: &'static str, value: &str, max: usize) -> LedgerResult<()> {
    let length = value.chars().count();
    if length > max {
        return Err(LedgerError::validation(
            field,
            format!("must be at most {max} characters, got {length}"),
        ));
    }
    Ok(())
}

/// Trims and lowercases an email address and checks its format.
pub fn email(field: &'static str, value: &str) -> LedgerResult<String> {
    let normalized = text(field, value, EMAIL_MAX)?.to_ascii_lowercase();
    if !email_regex().is_match(&normalized) {
        return Err(LedgerError::validation(field, "is not a valid email address"));
    }
    Ok(normalized)
}

/// Checks a non-negative decimal fits a `NUMERIC(digits, scale)` column.
pub fn amount(field: &'static str, value: Decimal, (digits, scale): (u32, u32)) -> LedgerResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(LedgerError::validation(field, "must not be negative"));
    }

    let normalized = value.normalize();
    if normalized.scale() > scale {
        return Err(LedgerError::validation(
            field,
            format!("must have at most {scale} decimal places"),
        ));
    }

    let integer_digits = normalized.trunc().abs().to_string().trim_start_matches('0').len() as u32;
    if integer_digits > digits - scale {
        return Err(LedgerError::validation(
            field,
            format!("must have at most {} digits before the decimal point", digits - scale),
        ));
    }

    Ok(value.round_dp(scale))
}

/// Checks a tax rate lies in `0..=100` with at most two decimals.
pub fn percent(field: &'static str, value: Decimal) -> LedgerResult<Decimal> {
    let value = amount(field, value, PERCENT)?;
    if value > Decimal::ONE_HUNDRED {
        return Err(LedgerError::validation(field, "must not exceed 100"));
    }
    Ok(value)
}

pub fn non_negative(field: &'static str, value: i32) -> LedgerResult<i32> {
    if value < 0 {
        return Err(LedgerError::validation(field, "must not be negative"));
    }
    Ok(value)
}

pub fn positive(field: &'static str, value: i32) -> LedgerResult<i32> {
    if value <= 0 {
        return Err(LedgerError::validation(field, "must be greater than zero"));
    }
    Ok(value)
}
