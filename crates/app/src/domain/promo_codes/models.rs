//! Promo Code Models

use jiff::Timestamp;
use pillbox::{
    discounts::DiscountRule,
    promo_codes::PromoCode as PromoCodeTerms,
};

use crate::uuids::TypedUuid;

/// Promo Code UUID
pub type PromoCodeUuid = TypedUuid<PromoCode>;

/// Longest accepted promo code, in characters.
pub const MAX_CODE_LENGTH: usize = 100;

/// Promo Code Model
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCode {
    pub uuid: PromoCodeUuid,
    pub terms: PromoCodeTerms,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Promo Code Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromoCode {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub rule: DiscountRule,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// Replacement terms for an existing promo code. The status is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCodeUpdate {
    pub code: String,
    pub rule: DiscountRule,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// Checked promo code terms, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidTerms {
    pub code: String,
    pub rule: DiscountRule,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl ValidTerms {
    /// Trim the code and check the terms an administrator supplied.
    pub(crate) fn check(
        code: &str,
        rule: DiscountRule,
        starts_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<Self, &'static str> {
        let code = code.trim();

        if code.is_empty() {
            return Err("code must not be empty");
        }

        if code.chars().count() > MAX_CODE_LENGTH {
            return Err("code must be at most 100 characters");
        }

        if rule.amount().is_zero() {
            return Err("discount must be greater than zero");
        }

        if ends_at <= starts_at {
            return Err("ends_at must be after starts_at");
        }

        Ok(Self {
            code: code.to_string(),
            rule,
            starts_at,
            ends_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn window() -> Result<(Timestamp, Timestamp), jiff::Error> {
        Ok((
            "2024-01-01T00:00:00Z".parse()?,
            "2024-01-31T00:00:00Z".parse()?,
        ))
    }

    #[test]
    fn code_is_trimmed() -> TestResult {
        let (starts_at, ends_at) = window()?;

        let rule = DiscountRule::fixed_amount(20)?;
        let terms = ValidTerms::check("  SAVE20 ", rule, starts_at, ends_at)?;

        assert_eq!(terms.code, "SAVE20");

        Ok(())
    }

    #[test]
    fn blank_and_oversized_codes_are_rejected() -> TestResult {
        let (starts_at, ends_at) = window()?;
        let rule = DiscountRule::percentage(5)?;

        assert!(ValidTerms::check("   ", rule, starts_at, ends_at).is_err());
        assert!(ValidTerms::check(&"X".repeat(101), rule, starts_at, ends_at).is_err());
        assert!(ValidTerms::check(&"X".repeat(100), rule, starts_at, ends_at).is_ok());

        Ok(())
    }

    #[test]
    fn zero_discount_is_rejected() -> TestResult {
        let (starts_at, ends_at) = window()?;

        let result = ValidTerms::check("FREE", DiscountRule::fixed_amount(0)?, starts_at, ends_at);

        assert_eq!(result, Err("discount must be greater than zero"));

        Ok(())
    }

    #[test]
    fn window_must_move_forward() -> TestResult {
        let (starts_at, ends_at) = window()?;
        let rule = DiscountRule::percentage(5)?;

        assert!(ValidTerms::check("BACKWARDS", rule, ends_at, starts_at).is_err());
        assert!(ValidTerms::check("INSTANT", rule, starts_at, starts_at).is_err());

        Ok(())
    }
}
