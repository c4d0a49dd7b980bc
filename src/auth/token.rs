/// Access token issuance and verification
///
/// Tokens are HS256 JWTs signed with a single process-wide secret. The key
/// lives behind an `ArcSwap`, so rotation is one atomic pointer store and
/// verification never blocks.
use super::AuthContext;
use crate::{error::AppResult, metrics};
use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Lifetime of an access token
pub const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Token id, only used to correlate log lines
    pub jti: String,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub account_id: i64,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Seconds from issuance until expiry
    pub fn expires_in(&self) -> i64 {
        ACCESS_TOKEN_LIFETIME_HOURS * 3600
    }
}

/// Why a token was refused
///
/// Only ever logged and counted; clients see one uniform rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Malformed,
    BadSignature,
    Expired,
    InvalidSubject,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::BadSignature => "bad_signature",
            TokenRejection::Expired => "expired",
            TokenRejection::InvalidSubject => "invalid_subject",
        }
    }
}

struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Holder of the current signing key
pub struct TokenKeys {
    current: ArcSwap<SigningKey>,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand against the caller's clock, without leeway
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            current: ArcSwap::from_pointee(SigningKey::from_secret(secret)),
            validation,
        }
    }

    /// Replace the signing key. Every token signed with the old key stops verifying.
    pub fn rotate(&self, secret: &str) {
        self.current.store(Arc::new(SigningKey::from_secret(secret)));
        tracing::info!("Token signing key rotated");
    }

    /// Issue a token for an account, valid for 24 hours from now
    pub fn issue(&self, account_id: i64) -> AppResult<IssuedToken> {
        self.issue_at(account_id, Utc::now())
    }

    pub fn issue_at(&self, account_id: i64, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        let expires_at = now + Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS);
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let key = self.current.load();
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key.encoding)?;

        tracing::debug!(account_id, token_id = %claims.jti, "Issued access token");

        Ok(IssuedToken {
            token,
            account_id,
            token_id: claims.jti,
            expires_at,
        })
    }

    /// Verify a token against the current key and clock
    pub fn verify(&self, token: &str) -> Result<AuthContext, TokenRejection> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`. Accepts iff the signature matches the
    /// current key and `now < exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthContext, TokenRejection> {
        let result = self.check(token, now);

        match &result {
            Ok(principal) => {
                metrics::record_token_verification("accepted");
                tracing::trace!(account_id = principal.account_id, "Token accepted");
            }
            Err(reason) => {
                metrics::record_token_verification(reason.as_str());
                tracing::debug!(reason = reason.as_str(), "Token rejected");
            }
        }

        result
    }

    fn check(&self, token: &str, now: DateTime<Utc>) -> Result<AuthContext, TokenRejection> {
        let key = self.current.load();
        let data = decode::<Claims>(token, &key.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            }
        })?;
        let claims = data.claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenRejection::Expired);
        }

        let account_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenRejection::InvalidSubject)?;

        Ok(AuthContext {
            account_id,
            token_id: claims.jti,
        })
    }
}
