//! # Auth Middleware
//!
//! Bearer-token extraction plus the role guards. The token guard
//! verifies the JWT and stashes the caller's identity in request
//! extensions; the role guards then re-read the user document, so a
//! role change takes effect on the next request, not at token expiry.

use axum::{
    extract::{Request, State},
    http::{header, Extensions, HeaderMap},
    middleware::Next,
    response::Response,
};
use hub_auth::{has_role, Claims, ROLE_ADMIN, ROLE_MANAGER};
use hub_core::HubError;
use hub_store::{collections, Filter};

use crate::error::ApiError;
use crate::state::AppState;

/// Verified caller identity, inserted by [`require_token`]
#[derive(Debug, Clone)]
pub struct Identity {
    pub claims: Claims,
}

impl Identity {
    pub fn email(&self) -> &str {
        &self.claims.email
    }
}

/// Verifies the bearer token and records the caller's identity
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;
    let claims = state.tokens.verify(token)?;
    req.extensions_mut().insert(Identity { claims });
    Ok(next.run(req).await)
}

/// Lets the request through only for admin accounts
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    ensure_role(&state, req.extensions(), ROLE_ADMIN).await?;
    Ok(next.run(req).await)
}

/// Lets the request through only for manager accounts
pub async fn require_manager(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    ensure_role(&state, req.extensions(), ROLE_MANAGER).await?;
    Ok(next.run(req).await)
}

async fn ensure_role(state: &AppState, extensions: &Extensions, role: &str) -> Result<(), ApiError> {
    let identity = extensions
        .get::<Identity>()
        .ok_or_else(|| HubError::Unauthorized("no verified identity on request".to_string()))?;

    let user = state
        .store
        .find_one(
            collections::USERS,
            &Filter::new().eq("email", identity.email()),
        )
        .await?;

    match user {
        Some(user) if has_role(&user, role) => Ok(()),
        _ => Err(HubError::Forbidden(format!("requires the {role} role")).into()),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| HubError::Unauthorized("missing Authorization header".to_string()))?;

    let header = header
        .to_str()
        .map_err(|_| HubError::Unauthorized("malformed Authorization header".to_string()))?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| HubError::Unauthorized("expected a bearer token".to_string()))?;

    let token = header.trim();
    if token.is_empty() {
        return Err(HubError::Unauthorized("empty bearer token".to_string()).into());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_rejects_missing_header() {
        assert!(extract_bearer(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_extract_bearer_rejects_wrong_scheme() {
        let headers = headers_with("Basic abc123");
        assert!(extract_bearer(&headers).is_err());
    }

    #[test]
    fn test_extract_bearer_rejects_empty_token() {
        let headers = headers_with("Bearer   ");
        assert!(extract_bearer(&headers).is_err());
    }
}
