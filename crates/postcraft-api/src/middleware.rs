use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use postcraft_types::api::Claims;

use crate::auth::AppState;
use crate::error::{ApiError, AuthError};

/// Extract and validate the bearer token; handlers behind this layer get
/// the `Claims` as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(req.headers(), &state.jwt_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Resolve the caller from `Authorization: Bearer <token>`; `sub` is the user id.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Claims, AuthError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::InvalidToken))
        .transpose()?
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingToken)?;

    // A header without the scheme is treated as a malformed token, not a missing one.
    let token = header_value
        .strip_prefix("Bearer")
        .map(str::trim)
        .unwrap_or(header_value);
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    verify_token(secret, token)
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::create_token;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_missing_token() {
        let err = authenticate(&HeaderMap::new(), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));

        let err = authenticate(&headers_with("Bearer "), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[test]
    fn valid_token_resolves_user() {
        let id = Uuid::new_v4();
        let token = create_token(SECRET, chrono::Duration::hours(1), id, "ada").unwrap();

        let claims = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap();
        assert_eq!(claims.sub, id);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = create_token("other-secret", chrono::Duration::hours(1), Uuid::new_v4(), "ada").unwrap();
        let err = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_invalid() {
        let token = create_token(SECRET, chrono::Duration::hours(-2), Uuid::new_v4(), "ada").unwrap();
        let err = verify_token(SECRET, &token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn garbage_is_invalid() {
        let err = authenticate(&headers_with("Bearer not.a.jwt"), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));

        let err = authenticate(&headers_with("Token abc"), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
