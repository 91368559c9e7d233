//! Promo Codes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pillbox::promo_codes::{PromoCode as PromoCodeTerms, PromoCodeStatus};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{try_get_discount_rule, try_get_parsed, try_get_timestamp},
    domain::promo_codes::models::{PromoCode, PromoCodeUuid, ValidTerms},
};

const CREATE_PROMO_CODE_SQL: &str = include_str!("sql/create_promo_code.sql");
const UPDATE_PROMO_CODE_SQL: &str = include_str!("sql/update_promo_code.sql");
const TOGGLE_PROMO_CODE_STATUS_SQL: &str = include_str!("sql/toggle_promo_code_status.sql");
const DELETE_PROMO_CODE_SQL: &str = include_str!("sql/delete_promo_code.sql");
const FIND_PROMO_CODE_BY_CODE_SQL: &str = include_str!("sql/find_promo_code_by_code.sql");
const FIND_PROMO_CODE_BY_UUID_SQL: &str = include_str!("sql/find_promo_code_by_uuid.sql");
const LIST_PROMO_CODES_SQL: &str = include_str!("sql/list_promo_codes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoCodesRepository;

impl PgPromoCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_promo_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: PromoCodeUuid,
        terms: &ValidTerms,
    ) -> Result<PromoCode, sqlx::Error> {
        query_as::<Postgres, PromoCode>(CREATE_PROMO_CODE_SQL)
            .bind(uuid.into_uuid())
            .bind(&terms.code)
            .bind(terms.rule.kind().as_str())
            .bind(terms.rule.amount())
            .bind(SqlxTimestamp::from(terms.starts_at))
            .bind(SqlxTimestamp::from(terms.ends_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_promo_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: PromoCodeUuid,
        terms: &ValidTerms,
    ) -> Result<PromoCode, sqlx::Error> {
        query_as::<Postgres, PromoCode>(UPDATE_PROMO_CODE_SQL)
            .bind(uuid.into_uuid())
            .bind(&terms.code)
            .bind(terms.rule.kind().as_str())
            .bind(terms.rule.amount())
            .bind(SqlxTimestamp::from(terms.starts_at))
            .bind(SqlxTimestamp::from(terms.ends_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn toggle_promo_code_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: PromoCodeUuid,
    ) -> Result<PromoCodeStatus, sqlx::Error> {
        let row = query(TOGGLE_PROMO_CODE_STATUS_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_parsed(&row, "status")
    }

    pub(crate) async fn delete_promo_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: PromoCodeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROMO_CODE_SQL)
            .bind(uuid.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<PromoCode>, sqlx::Error> {
        query_as::<Postgres, PromoCode>(FIND_PROMO_CODE_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_uuid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: PromoCodeUuid,
    ) -> Result<Option<PromoCode>, sqlx::Error> {
        query_as::<Postgres, PromoCode>(FIND_PROMO_CODE_BY_UUID_SQL)
            .bind(uuid.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_promo_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PromoCode>, sqlx::Error> {
        query_as::<Postgres, PromoCode>(LIST_PROMO_CODES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PromoCode {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PromoCodeUuid::from_uuid(row.try_get("uuid")?),
            terms: PromoCodeTerms {
                code: row.try_get("code")?,
                rule: try_get_discount_rule(row, "discount_type", "discount_amount")?,
                starts_at: try_get_timestamp(row, "starts_at")?,
                ends_at: try_get_timestamp(row, "ends_at")?,
                status: try_get_parsed(row, "status")?,
            },
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
