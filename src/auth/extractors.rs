use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::dto::AuthenticatedUser;
use crate::{error::ApiError, state::AppState};

/// Resolves the bearer token to a stored user before the handler runs.
pub struct AuthUser(pub AuthenticatedUser);

/// Token part of an `Authorization: Bearer <token>` header value. The
/// scheme name is case-insensitive.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let token = bearer_token(auth).ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let Some(email) = state.keys.verify(token) else {
            warn!("invalid or expired token");
            return Err(ApiError::Unauthorized("Invalid token or user not found"));
        };

        let Some(record) = state.users.get(&email).await else {
            warn!(email = %email, "token subject not in store");
            return Err(ApiError::Unauthorized("Invalid token or user not found"));
        };

        Ok(AuthUser(AuthenticatedUser {
            email,
            full_name: record.full_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("BeArEr abc"), Some("abc"));
        assert_eq!(bearer_token("Bearerabc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
