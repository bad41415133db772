use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token ttl must be positive")]
    InvalidTtl,
    #[error("malformed token")]
    Malformed(#[source] jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject_id: String,
    pub expires_at: OffsetDateTime,
}

/// Signing and verification keys plus the issuing policy.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::minutes(config.ttl_minutes),
        }
    }

    /// Issues a token for `subject_id`, using the configured ttl when `ttl` is `None`.
    pub fn issue(&self, subject_id: &str, ttl: Option<Duration>) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject_id, ttl, OffsetDateTime::now_utc())
    }

    pub fn issue_at(
        &self,
        subject_id: &str,
        ttl: Option<Duration>,
        now: OffsetDateTime,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = ttl.unwrap_or(self.ttl);
        if !ttl.is_positive() {
            return Err(TokenError::InvalidTtl);
        }
        let expires_at = now.checked_add(ttl).ok_or(TokenError::InvalidTtl)?;
        // `exp` is whole seconds; a sub-second ttl can truncate to an already-past expiry.
        if expires_at.unix_timestamp() <= now.unix_timestamp() {
            return Err(TokenError::InvalidTtl);
        }

        let claims = Claims {
            sub: subject_id.to_string(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(user_id = %subject_id, exp = claims.exp, "jwt signed");

        // Report the second-truncated expiry that is actually embedded.
        let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp)
            .map_err(|_| TokenError::InvalidTtl)?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Expiry is strict: a token whose `exp` equals `now` is already expired.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<VerifiedToken, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        // Checked below against `now` with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(TokenError::Malformed)?;
        let claims = data.claims;

        if claims.exp <= now.unix_timestamp() {
            return Err(TokenError::Expired);
        }
        let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp).map_err(|_| {
            TokenError::Malformed(jsonwebtoken::errors::ErrorKind::InvalidToken.into())
        })?;

        debug!(user_id = %claims.sub, "jwt verified");
        Ok(VerifiedToken {
            subject_id: claims.sub,
            expires_at,
        })
    }
}
