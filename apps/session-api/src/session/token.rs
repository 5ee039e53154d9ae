//! Access-token payload codec and validation.
//!
//! Tokens are issued elsewhere and stored in the global `im_access_token`
//! hash: the field is the raw token bytes, the value a fixed 10-byte payload
//!
//! ```text
//! user_id: i64 BE (8) | forbidden: u8 (1) | notification_on: u8 (1)
//! ```
//!
//! There is no version byte or length prefix; the length is the only
//! discriminant.

use std::sync::Arc;

use im_common::keys::ACCESS_TOKEN_TABLE;
use im_common::{AppId, UserId};
use serde::Serialize;

use crate::db::kv::KeyValueStore;
use crate::error::SessionError;

/// Size of an encoded payload.
pub const AUTH_INFO_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Forbidden flag
// ---------------------------------------------------------------------------

/// Whether a user is blocked. What it gates is up to the caller.
///
/// Stored as a boolean byte in token payloads and as an integer in user
/// records; [`Forbidden::as_flag`] and [`Forbidden::from_flag`] are the only
/// conversions to that integer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Forbidden {
    #[default]
    Allowed,
    Blocked,
}

impl Forbidden {
    pub fn is_blocked(self) -> bool {
        self == Self::Blocked
    }

    /// Integer form: 0 = allowed, 1 = blocked.
    pub fn as_flag(self) -> i32 {
        match self {
            Self::Allowed => 0,
            Self::Blocked => 1,
        }
    }

    /// Any non-zero flag counts as blocked.
    pub fn from_flag(flag: i64) -> Self {
        Self::from(flag != 0)
    }
}

impl From<bool> for Forbidden {
    fn from(blocked: bool) -> Self {
        if blocked {
            Self::Blocked
        } else {
            Self::Allowed
        }
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthInfo {
    pub user_id: UserId,
    pub forbidden: Forbidden,
    pub notification_on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("token does not exist")]
    NotExist,

    #[error("token data malformed: expected 10 bytes, got {0}")]
    Malformed(usize),
}

pub fn encode(info: &AuthInfo) -> [u8; AUTH_INFO_LEN] {
    let mut buf = [0u8; AUTH_INFO_LEN];
    buf[..8].copy_from_slice(&info.user_id.to_be_bytes());
    buf[8] = info.forbidden.is_blocked() as u8;
    buf[9] = info.notification_on as u8;
    buf
}

pub fn decode(raw: &[u8]) -> Result<AuthInfo, CodecError> {
    match raw.len() {
        0 => Err(CodecError::NotExist),
        AUTH_INFO_LEN => {
            let mut user_id = [0u8; 8];
            user_id.copy_from_slice(&raw[..8]);
            Ok(AuthInfo {
                user_id: i64::from_be_bytes(user_id),
                forbidden: Forbidden::from(raw[8] != 0),
                notification_on: raw[9] != 0,
            })
        }
        len => Err(CodecError::Malformed(len)),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Identity resolved from a presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedToken {
    pub app_id: AppId,
    pub user_id: UserId,
    #[serde(serialize_with = "serialize_flag")]
    pub forbidden: Forbidden,
    pub notification_on: bool,
}

impl ValidatedToken {
    /// Forbidden flag in the integer form used by user records.
    pub fn forbidden_flag(&self) -> i32 {
        self.forbidden.as_flag()
    }
}

fn serialize_flag<S: serde::Serializer>(f: &Forbidden, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i32(f.as_flag())
}

/// Resolves hex tokens against the global token table.
///
/// The token table carries no tenant, so every token validated here belongs
/// to the single `app_id` the validator was built with. Multi-tenant token
/// issuance would need a tenant in the payload or a table per tenant.
#[derive(Clone)]
pub struct TokenValidator {
    kv: Arc<dyn KeyValueStore>,
    app_id: AppId,
}

impl TokenValidator {
    pub fn new(kv: Arc<dyn KeyValueStore>, app_id: AppId) -> Self {
        Self { kv, app_id }
    }

    /// Validate a hex-encoded token presented by a client.
    ///
    /// Unlike sync cursors this path fails closed: a malformed, unknown or
    /// unreadable token is always an error.
    pub async fn validate(&self, token: &str) -> Result<ValidatedToken, SessionError> {
        let raw = hex::decode(token).map_err(|e| {
            tracing::warn!(?e, "token string error");
            SessionError::TokenFormat(e)
        })?;

        let payload = self
            .kv
            .hget(ACCESS_TOKEN_TABLE, &raw)
            .await
            .map_err(|e| {
                tracing::info!(?e, "token lookup failed");
                SessionError::Storage(e)
            })?
            .ok_or(SessionError::TokenNotFound)?;

        let info = decode(&payload).map_err(|e| {
            tracing::warn!(?e, "token payload decode failed");
            e
        })?;

        Ok(ValidatedToken {
            app_id: self.app_id,
            user_id: info.user_id,
            forbidden: info.forbidden,
            notification_on: info.notification_on,
        })
    }

    /// Store a payload for `token` in the token table.
    ///
    /// Validation never calls this; it exists for issuers sharing the crate.
    pub async fn issue(&self, token: &[u8], info: &AuthInfo) -> Result<(), SessionError> {
        self.kv.hset(ACCESS_TOKEN_TABLE, token, &encode(info)).await?;
        tracing::debug!(user_id = info.user_id, "access token issued");
        Ok(())
    }
}
