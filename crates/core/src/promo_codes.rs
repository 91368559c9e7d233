//! Promo codes

use std::str::FromStr;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discounts::{DiscountKind, DiscountRule};

/// Reasons a promo code cannot be attached to a cart or order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromoCodeError {
    /// No usable code: unknown, inactive, or outside its date window.
    #[error("promo code not found")]
    NotFound,

    /// Fixed-amount codes require the subtotal to cover the discount.
    #[error("subtotal {subtotal} is below the promo code minimum of {minimum}")]
    BelowMinimum {
        /// Smallest subtotal the code accepts.
        minimum: Decimal,

        /// Subtotal the code was checked against.
        subtotal: Decimal,
    },

    /// The promo code status tag was not recognised.
    #[error("unknown promo code status {0:?}")]
    UnknownStatus(String),
}

/// Whether a promo code may currently be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoCodeStatus {
    /// Redeemable inside its date window.
    Active,

    /// Switched off by an administrator.
    Inactive,
}

impl PromoCodeStatus {
    /// Canonical string tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

impl FromStr for PromoCodeStatus {
    type Err = PromoCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(PromoCodeError::UnknownStatus(other.to_string())),
        }
    }
}

/// A cart-level discount redeemable by code inside a date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    /// The code customers type in.
    pub code: String,

    /// Discount applied to the aggregate total.
    pub rule: DiscountRule,

    /// First instant the code is valid (inclusive).
    pub starts_at: Timestamp,

    /// Last instant the code is valid (inclusive).
    pub ends_at: Timestamp,

    /// Administrative on/off switch.
    pub status: PromoCodeStatus,
}

impl PromoCode {
    /// Whether `now` falls inside the code's window, both ends inclusive.
    pub fn is_within_window(&self, now: Timestamp) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }

    /// Check the code can be redeemed at `now` against `candidate_subtotal` and return its rule.
    ///
    /// Only fixed-amount codes carry a minimum: the subtotal must be at least the discount
    /// amount. Percentage codes are accepted for any subtotal.
    ///
    /// # Errors
    ///
    /// - [`PromoCodeError::NotFound`] when the code is inactive or `now` is outside its window.
    /// - [`PromoCodeError::BelowMinimum`] when a fixed-amount code exceeds the subtotal.
    pub fn validate(
        &self,
        now: Timestamp,
        candidate_subtotal: Decimal,
    ) -> Result<DiscountRule, PromoCodeError> {
        if self.status != PromoCodeStatus::Active || !self.is_within_window(now) {
            return Err(PromoCodeError::NotFound);
        }

        if self.rule.kind() == DiscountKind::FixedAmount && candidate_subtotal < self.rule.amount()
        {
            return Err(PromoCodeError::BelowMinimum {
                minimum: self.rule.amount(),
                subtotal: candidate_subtotal,
            });
        }

        Ok(self.rule)
    }
}

/// Validate an optional lookup result; a missing code is [`PromoCodeError::NotFound`].
///
/// # Errors
///
/// See [`PromoCode::validate`].
pub fn validate(
    code: Option<&PromoCode>,
    now: Timestamp,
    candidate_subtotal: Decimal,
) -> Result<DiscountRule, PromoCodeError> {
    code.ok_or(PromoCodeError::NotFound)?
        .validate(now, candidate_subtotal)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    fn save20() -> Result<PromoCode, Box<dyn std::error::Error>> {
        Ok(PromoCode {
            code: "SAVE20".to_string(),
            rule: DiscountRule::fixed_amount(dec!(20))?,
            starts_at: "2024-01-01T00:00:00Z".parse()?,
            ends_at: "2024-01-31T00:00:00Z".parse()?,
            status: PromoCodeStatus::Active,
        })
    }

    #[test]
    fn code_outside_window_is_not_found() -> TestResult {
        let code = save20()?;

        let result = code.validate("2024-02-01T00:00:00Z".parse()?, dec!(100));

        assert_eq!(result, Err(PromoCodeError::NotFound));

        let result = code.validate("2023-12-31T23:59:59Z".parse()?, dec!(100));

        assert_eq!(result, Err(PromoCodeError::NotFound));

        Ok(())
    }

    #[test]
    fn window_is_inclusive_on_both_ends() -> TestResult {
        let code = save20()?;

        assert_eq!(code.validate(code.starts_at, dec!(100))?, code.rule);
        assert_eq!(code.validate(code.ends_at, dec!(100))?, code.rule);

        Ok(())
    }

    #[test]
    fn fixed_amount_requires_subtotal_to_cover_discount() -> TestResult {
        let code = save20()?;
        let now = "2024-01-15T12:00:00Z".parse()?;

        assert_eq!(code.validate(now, dec!(20))?, code.rule);
        assert_eq!(code.validate(now, dec!(20.01))?, code.rule);
        assert_eq!(
            code.validate(now, dec!(19.99)),
            Err(PromoCodeError::BelowMinimum {
                minimum: dec!(20),
                subtotal: dec!(19.99),
            })
        );

        Ok(())
    }

    #[test]
    fn percentage_codes_have_no_minimum() -> TestResult {
        let code = PromoCode {
            rule: DiscountRule::percentage(dec!(50))?,
            ..save20()?
        };

        let now = "2024-01-15T12:00:00Z".parse()?;

        assert_eq!(code.validate(now, dec!(0.01))?, code.rule);
        assert_eq!(code.validate(now, Decimal::ZERO)?, code.rule);

        Ok(())
    }

    #[test]
    fn inactive_code_is_not_found() -> TestResult {
        let code = PromoCode {
            status: PromoCodeStatus::Inactive,
            ..save20()?
        };

        let result = code.validate("2024-01-15T12:00:00Z".parse()?, dec!(100));

        assert_eq!(result, Err(PromoCodeError::NotFound));

        Ok(())
    }

    #[test]
    fn missing_code_is_not_found() -> TestResult {
        let result = validate(None, "2024-01-15T12:00:00Z".parse()?, dec!(100));

        assert_eq!(result, Err(PromoCodeError::NotFound));

        Ok(())
    }

    #[test]
    fn status_toggles_and_round_trips() -> TestResult {
        assert_eq!(PromoCodeStatus::Active.toggled(), PromoCodeStatus::Inactive);
        assert_eq!(PromoCodeStatus::Inactive.toggled(), PromoCodeStatus::Active);

        for status in [PromoCodeStatus::Active, PromoCodeStatus::Inactive] {
            assert_eq!(status.as_str().parse::<PromoCodeStatus>()?, status);
        }

        Ok(())
    }
}
