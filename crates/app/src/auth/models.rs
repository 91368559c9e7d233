//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::domain::customers::models::CustomerUuid;

/// Token row matched during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    pub uuid: Uuid,
    pub customer_uuid: CustomerUuid,
}

/// API token metadata persisted in storage. The token itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub customer_uuid: CustomerUuid,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New API token persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewApiToken {
    pub uuid: Uuid,
    pub customer_uuid: CustomerUuid,
    pub token_hash: String,
}

/// Result of issuing a token. `token` is shown once and cannot be recovered.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
