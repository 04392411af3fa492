//! Compact HS256 bearer tokens.
//!
//! Wire format: `base64url(header).base64url(claims).base64url(hmac)`, where the
//! HMAC-SHA256 is computed over the ASCII bytes `"<header>.<claims>"`. The header
//! is always `{"alg":"HS256","typ":"JWT"}`.

use std::sync::Arc;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::authz::PermissionTier;
use crate::errors::AppError;
use crate::utils::epoch_now;

type HmacSha256 = Hmac<Sha256>;

/// Tokens live for seven days from issuance.
pub const TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

// URL-safe alphabet, unpadded on encode, padding optional on decode.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: TokenHeader = TokenHeader {
    alg: "HS256",
    typ: "JWT",
};

/// Identity fields stamped into a token at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub sub: String,
    pub username: String,
    pub permission: PermissionTier,
}

impl TokenIdentity {
    pub fn new(sub: impl Into<String>, username: impl Into<String>, permission: PermissionTier) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
            permission,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub permission: PermissionTier,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    secret: Arc<Vec<u8>>,
}

impl JwtConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        if secret.is_empty() {
            return Err(AppError::configuration("JWT_SECRET must not be empty"));
        }
        Ok(Self::new(secret))
    }

    /// Issue a token for `identity`, valid for [`TOKEN_TTL_SECONDS`] from now.
    pub fn sign(&self, identity: &TokenIdentity) -> Result<String, AppError> {
        self.sign_at(identity, epoch_now())
    }

    pub fn sign_at(&self, identity: &TokenIdentity, issued_at: i64) -> Result<String, AppError> {
        let claims = Claims {
            sub: identity.sub.clone(),
            username: identity.username.clone(),
            permission: identity.permission,
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECONDS,
        };

        let header = serde_json::to_vec(&HEADER).map_err(|err| AppError::internal(err.to_string()))?;
        let payload = serde_json::to_vec(&claims).map_err(|err| AppError::internal(err.to_string()))?;
        let signing_input = format!("{}.{}", BASE64URL.encode(header), BASE64URL.encode(payload));

        let mut mac = self.mac().ok_or_else(|| AppError::internal("invalid token key"))?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{signing_input}.{}", BASE64URL.encode(signature)))
    }

    /// Verified claims, or `None` for anything malformed, forged or expired.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, epoch_now())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Option<Claims> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return None;
        };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return None;
        }

        let signature = BASE64URL.decode(signature).ok()?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let payload = BASE64URL.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&payload).ok()?;

        if claims.exp <= now {
            return None;
        }

        Some(claims)
    }

    fn mac(&self) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).ok()
    }
}
