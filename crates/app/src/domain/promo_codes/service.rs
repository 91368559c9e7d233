//! Promo codes service.

use async_trait::async_trait;
use mockall::automock;
use pillbox::promo_codes::PromoCodeStatus;
use tracing::info;

use crate::{
    database::Db,
    domain::promo_codes::{
        errors::PromoCodesServiceError,
        models::{NewPromoCode, PromoCode, PromoCodeUpdate, PromoCodeUuid, ValidTerms},
        repository::PgPromoCodesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPromoCodesService {
    db: Db,
    repository: PgPromoCodesRepository,
}

impl PgPromoCodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromoCodesRepository::new(),
        }
    }
}

#[async_trait]
impl PromoCodesService for PgPromoCodesService {
    #[tracing::instrument(
        name = "promo_codes.service.create_promo_code",
        skip(self, promo_code),
        fields(promo_code_uuid = %promo_code.uuid),
        err
    )]
    async fn create_promo_code(
        &self,
        promo_code: NewPromoCode,
    ) -> Result<PromoCode, PromoCodesServiceError> {
        let terms = ValidTerms::check(
            &promo_code.code,
            promo_code.rule,
            promo_code.starts_at,
            promo_code.ends_at,
        )
        .map_err(PromoCodesServiceError::Validation)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_promo_code(&mut tx, promo_code.uuid, &terms)
            .await?;

        tx.commit().await?;

        info!(promo_code_uuid = %created.uuid, code = %created.terms.code, "created promo code");

        Ok(created)
    }

    #[tracing::instrument(
        name = "promo_codes.service.update_promo_code",
        skip(self, update),
        fields(promo_code_uuid = %uuid),
        err
    )]
    async fn update_promo_code(
        &self,
        uuid: PromoCodeUuid,
        update: PromoCodeUpdate,
    ) -> Result<PromoCode, PromoCodesServiceError> {
        let terms = ValidTerms::check(&update.code, update.rule, update.starts_at, update.ends_at)
            .map_err(PromoCodesServiceError::Validation)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_promo_code(&mut tx, uuid, &terms)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "promo_codes.service.toggle_promo_code_status",
        skip(self),
        fields(promo_code_uuid = %uuid),
        err
    )]
    async fn toggle_promo_code_status(
        &self,
        uuid: PromoCodeUuid,
    ) -> Result<PromoCodeStatus, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let status = self
            .repository
            .toggle_promo_code_status(&mut tx, uuid)
            .await?;

        tx.commit().await?;

        info!(promo_code_uuid = %uuid, status = status.as_str(), "toggled promo code");

        Ok(status)
    }

    #[tracing::instrument(
        name = "promo_codes.service.delete_promo_code",
        skip(self),
        fields(promo_code_uuid = %uuid),
        err
    )]
    async fn delete_promo_code(&self, uuid: PromoCodeUuid) -> Result<(), PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_promo_code(&mut tx, uuid).await?;

        if rows_affected == 0 {
            return Err(PromoCodesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(name = "promo_codes.service.find_by_code", skip(self), err)]
    async fn find_by_code(&self, code: &str) -> Result<PromoCode, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let promo_code = self.repository.find_by_code(&mut tx, code.trim()).await?;

        tx.commit().await?;

        promo_code.ok_or(PromoCodesServiceError::NotFound)
    }

    #[tracing::instrument(name = "promo_codes.service.list_promo_codes", skip(self), err)]
    async fn list_promo_codes(&self) -> Result<Vec<PromoCode>, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let promo_codes = self.repository.list_promo_codes(&mut tx).await?;

        tx.commit().await?;

        Ok(promo_codes)
    }
}

#[automock]
#[async_trait]
pub trait PromoCodesService: Send + Sync {
    /// Creates an active promo code.
    async fn create_promo_code(
        &self,
        promo_code: NewPromoCode,
    ) -> Result<PromoCode, PromoCodesServiceError>;

    /// Replaces the code, discount and window of a promo code.
    async fn update_promo_code(
        &self,
        uuid: PromoCodeUuid,
        update: PromoCodeUpdate,
    ) -> Result<PromoCode, PromoCodesServiceError>;

    /// Flips a promo code between active and inactive and returns the new status.
    async fn toggle_promo_code_status(
        &self,
        uuid: PromoCodeUuid,
    ) -> Result<PromoCodeStatus, PromoCodesServiceError>;

    /// Soft deletes a promo code. Deleted codes are never found again.
    async fn delete_promo_code(&self, uuid: PromoCodeUuid) -> Result<(), PromoCodesServiceError>;

    /// Looks up a promo code by the code customers type in.
    async fn find_by_code(&self, code: &str) -> Result<PromoCode, PromoCodesServiceError>;

    /// Lists every promo code that has not been deleted, newest first.
    async fn list_promo_codes(&self) -> Result<Vec<PromoCode>, PromoCodesServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use pillbox::discounts::DiscountRule;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers};

    use super::*;

    fn new_promo_code(code: &str) -> Result<NewPromoCode, Box<dyn std::error::Error>> {
        Ok(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: code.to_string(),
            rule: DiscountRule::fixed_amount(dec!(20))?,
            starts_at: "2024-01-01T00:00:00Z".parse::<Timestamp>()?,
            ends_at: "2024-01-31T00:00:00Z".parse::<Timestamp>()?,
        })
    }

    #[tokio::test]
    async fn create_promo_code_trims_and_activates() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promo_codes
            .create_promo_code(new_promo_code("  SAVE20  ")?)
            .await?;

        assert_eq!(created.terms.code, "SAVE20");
        assert_eq!(created.terms.status, PromoCodeStatus::Active);
        assert_eq!(created.terms.rule, DiscountRule::fixed_amount(dec!(20))?);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.promo_codes
            .create_promo_code(new_promo_code("SAVE20")?)
            .await?;

        let result = ctx
            .promo_codes
            .create_promo_code(new_promo_code("SAVE20")?)
            .await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalid_window_is_rejected_before_storage() -> TestResult {
        let ctx = TestContext::new().await;

        let mut promo_code = new_promo_code("BACKWARDS")?;
        promo_code.ends_at = promo_code.starts_at;

        let result = ctx.promo_codes.create_promo_code(promo_code).await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_by_code_returns_created_code() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promo_codes
            .create_promo_code(new_promo_code("WELCOME")?)
            .await?;

        let found = ctx.promo_codes.find_by_code("WELCOME").await?;

        assert_eq!(found, created);

        Ok(())
    }

    #[tokio::test]
    async fn toggle_flips_status_both_ways() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promo_codes
            .create_promo_code(new_promo_code("FLIP")?)
            .await?;

        let first = ctx.promo_codes.toggle_promo_code_status(created.uuid).await?;
        let second = ctx.promo_codes.toggle_promo_code_status(created.uuid).await?;

        assert_eq!(first, PromoCodeStatus::Inactive);
        assert_eq!(second, PromoCodeStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_terms() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promo_codes
            .create_promo_code(new_promo_code("SPRING")?)
            .await?;

        let updated = ctx
            .promo_codes
            .update_promo_code(
                created.uuid,
                PromoCodeUpdate {
                    code: "SPRING25".to_string(),
                    rule: DiscountRule::percentage(25)?,
                    starts_at: created.terms.starts_at,
                    ends_at: "2024-03-31T00:00:00Z".parse()?,
                },
            )
            .await?;

        assert_eq!(updated.uuid, created.uuid);
        assert_eq!(updated.terms.code, "SPRING25");
        assert_eq!(updated.terms.rule, DiscountRule::percentage(25)?);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_code_is_not_found_and_code_can_be_reused() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promo_codes
            .create_promo_code(new_promo_code("ONCE")?)
            .await?;

        ctx.promo_codes.delete_promo_code(created.uuid).await?;

        let result = ctx.promo_codes.find_by_code("ONCE").await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let again = ctx.promo_codes.delete_promo_code(created.uuid).await;

        assert!(
            matches!(again, Err(PromoCodesServiceError::NotFound)),
            "expected NotFound on second delete, got {again:?}"
        );

        ctx.promo_codes
            .create_promo_code(new_promo_code("ONCE")?)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn list_excludes_deleted_codes() -> TestResult {
        let ctx = TestContext::new().await;

        let kept = helpers::create_promo_code(&ctx, "KEEP", DiscountRule::percentage(5)?).await?;
        let gone = helpers::create_promo_code(&ctx, "GONE", DiscountRule::percentage(5)?).await?;

        ctx.promo_codes.delete_promo_code(gone.uuid).await?;

        let listed = ctx.promo_codes.list_promo_codes().await?;

        assert_eq!(listed, vec![kept]);

        Ok(())
    }
}
