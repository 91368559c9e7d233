//! Auth repository.

use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::models::{ActiveApiToken, ApiTokenMetadata, NewApiToken},
    database::{try_get_optional_timestamp, try_get_timestamp},
    domain::customers::models::CustomerUuid,
};

const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const FIND_CUSTOMER_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_customer_by_token_hash.sql");
const TOUCH_API_TOKEN_LAST_USED_SQL: &str = include_str!("sql/touch_api_token_last_used.sql");
const LIST_API_TOKENS_SQL: &str = include_str!("sql/list_api_tokens.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_api_token(
        &self,
        token: &NewApiToken,
    ) -> Result<ApiTokenMetadata, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(CREATE_API_TOKEN_SQL)
            .bind(token.uuid)
            .bind(token.customer_uuid.into_uuid())
            .bind(&token.token_hash)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_active_api_token_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<ActiveApiToken>, sqlx::Error> {
        query_as::<Postgres, ActiveApiToken>(FIND_CUSTOMER_BY_TOKEN_HASH_SQL)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn touch_api_token_last_used(&self, token: Uuid) -> Result<(), sqlx::Error> {
        query(TOUCH_API_TOKEN_LAST_USED_SQL)
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_api_tokens_by_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<ApiTokenMetadata>, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(LIST_API_TOKENS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&self.pool)
            .await
    }

    pub(crate) async fn revoke_api_token(
        &self,
        token: Uuid,
    ) -> Result<Option<ApiTokenMetadata>, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(REVOKE_API_TOKEN_SQL)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ActiveApiToken {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenMetadata {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            created_at: try_get_timestamp(row, "created_at")?,
            last_used_at: try_get_optional_timestamp(row, "last_used_at")?,
            revoked_at: try_get_optional_timestamp(row, "revoked_at")?,
        })
    }
}
