use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{
    repo_types::User,
    services::{authenticate, AuthError},
};
use crate::{error::AppError, state::AppState};

/// The user resolved from the request's bearer token.
pub struct AuthUser(pub User);

/// Pulls the token out of `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingCredential)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthError::MissingCredential)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingCredential);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user = authenticate(state.users.as_ref(), &state.keys, token).await?;
        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn accepts_bearer_in_any_case() {
        assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(&headers("BEARER abc")).unwrap(), "abc");
    }

    #[test]
    fn missing_or_foreign_scheme_is_missing_credential() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            bearer_token(&headers("Basic YWxpY2U6cHcx")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer   ")),
            Err(AuthError::MissingCredential)
        ));
    }
}
