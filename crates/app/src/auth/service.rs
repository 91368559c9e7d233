//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, format_api_token,
        generate_api_token_secret, hash_api_token, models::NewApiToken, parse_api_token,
        repository::PgAuthRepository,
    },
    domain::customers::models::CustomerUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given customer.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::UnknownCustomer`] when the customer does not exist, or a
    /// storage error if the insert fails.
    #[tracing::instrument(
        name = "auth.service.issue_api_token",
        skip(self),
        fields(customer_uuid = %customer),
        err
    )]
    pub async fn issue_api_token(
        &self,
        customer: CustomerUuid,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, ApiTokenVersion::V1, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                customer_uuid: customer,
                token_hash: hash_api_token(&token),
            })
            .await?;

        info!(token_uuid = %token_uuid, "issued api token");

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_customer(customer)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[tracing::instrument(name = "auth.service.revoke_api_token", skip(self), err)]
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<CustomerUuid, AuthServiceError> {
        parse_api_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token_by_hash(&hash_api_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if let Err(error) = self.repository.touch_api_token_last_used(token.uuid).await {
            warn!(token_uuid = %token.uuid, %error, "failed to record token use");
        }

        Ok(token.customer_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the customer that owns it.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<CustomerUuid, AuthServiceError>;
}
