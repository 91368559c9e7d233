//! API token formatting, parsing and hashing.

use std::{fmt, fmt::Write as _, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "pb";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const API_TOKEN_SECRET_HEX_CHARS: usize = API_TOKEN_SECRET_BYTES * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

/// Random token secret. Zeroed on drop and redacted from debug output.
#[derive(Clone)]
pub struct ApiTokenSecret {
    bytes: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
    pub version: ApiTokenVersion,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    ApiTokenSecret::from_bytes(secret)
}

/// Render a token as `pb_<version>_<uuid>.<secret hex>`.
#[must_use]
pub fn format_api_token(
    token_uuid: Uuid,
    version: ApiTokenVersion,
    secret: &ApiTokenSecret,
) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        token_uuid.simple(),
        to_hex(secret.as_bytes())
    )
}

/// Check the shape of a presented token.
///
/// # Errors
///
/// Returns an error when the prefix, version, uuid or secret segment is malformed.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (prefix_and_id, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let (Some(prefix), Some(version), Some(token_uuid)) =
        (id_parts.next(), id_parts.next(), id_parts.next())
    else {
        return Err(ApiTokenError::InvalidFormat);
    };

    if prefix != API_TOKEN_PREFIX {
        return Err(ApiTokenError::InvalidFormat);
    }

    let version = version.parse::<ApiTokenVersion>()?;
    let token_uuid = Uuid::try_parse(token_uuid).map_err(|_| ApiTokenError::InvalidFormat)?;

    if secret_hex.len() != API_TOKEN_SECRET_HEX_CHARS
        || !secret_hex.bytes().all(|byte| byte.is_ascii_hexdigit())
    {
        return Err(ApiTokenError::InvalidSecretEncoding);
    }

    Ok(ParsedApiToken {
        token_uuid,
        version,
    })
}

/// SHA-256 digest of the whole token, lowercase hex. This is the only form stored.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    to_hex(&Sha256::digest(token.as_bytes()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formatted_tokens_parse() -> TestResult {
        let token_uuid = Uuid::nil();
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);
        let token = format_api_token(token_uuid, ApiTokenVersion::V1, &secret);

        assert!(token.starts_with("pb_v1_00000000000000000000000000000000.abab"));

        let parsed = parse_api_token(&token)?;

        assert_eq!(parsed.token_uuid, token_uuid);
        assert_eq!(parsed.version, ApiTokenVersion::V1);

        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        let secret = "ab".repeat(API_TOKEN_SECRET_BYTES);

        assert_eq!(
            parse_api_token(&format!("nope_v1_{}.{secret}", Uuid::nil().simple())).err(),
            Some(ApiTokenError::InvalidFormat)
        );
        assert_eq!(
            parse_api_token(&format!("pb_v9_{}.{secret}", Uuid::nil().simple())).err(),
            Some(ApiTokenError::UnsupportedVersion)
        );
        assert_eq!(
            parse_api_token(&format!("pb_v1_{}.zz", Uuid::nil().simple())).err(),
            Some(ApiTokenError::InvalidSecretEncoding)
        );
        assert_eq!(
            parse_api_token("pb_v1_missing-dot").err(),
            Some(ApiTokenError::InvalidFormat)
        );
    }

    #[test]
    fn hash_is_stable_sha256_hex() {
        assert_eq!(
            hash_api_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_api_token("abc"), hash_api_token("abc"));
        assert_ne!(hash_api_token("abc"), hash_api_token("abd"));
    }

    #[test]
    fn secrets_are_redacted_and_random() {
        let first = generate_api_token_secret();
        let second = generate_api_token_secret();

        assert_eq!(format!("{first:?}"), "ApiTokenSecret(**redacted**)");
        assert_ne!(first.as_bytes(), second.as_bytes());
    }
}
