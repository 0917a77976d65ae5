use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use uuid::Uuid;

use crate::auth::token::{self, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated identity context extracted from a verified session token.
///
/// Convention: an identity carrying a manager pointer is a Technician
/// managed by that identity; one without is a Manager. Attached to the
/// request as an extension and read-only from then on.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub manager_id: Option<Uuid>,
}

impl AuthUser {
    pub fn is_technician(&self) -> bool {
        self.manager_id.is_some()
    }

    pub fn is_manager(&self) -> bool {
        self.manager_id.is_none()
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            manager_id: claims.manager_id,
        }
    }
}

/// Bearer-token authentication middleware.
///
/// Every failure past the missing-header check maps to the same 401 body:
/// the caller never learns whether the signature, structure, or expiry was
/// at fault. The sub-reason goes to the server log only.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let secret = &config::config().security.jwt_secret;
    let claims = token::verify(&token, secret).map_err(|err| {
        tracing::warn!("Token verification failed: {}", err);
        ApiError::unauthorized("Invalid authorization token")
    })?;

    // Convert claims to AuthUser and inject into the request
    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
///
/// Accepts both `Authorization: <token>` and `Authorization: Bearer <token>`.
fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_raw_and_bearer_prefixed_tokens() {
        assert_eq!(
            extract_token_from_headers(&headers_with("abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(
            extract_token_from_headers(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn rejects_missing_and_empty_headers() {
        assert_eq!(extract_token_from_headers(&HeaderMap::new()), None);
        assert_eq!(extract_token_from_headers(&headers_with("")), None);
        assert_eq!(extract_token_from_headers(&headers_with("Bearer ")), None);
        assert_eq!(extract_token_from_headers(&headers_with("   ")), None);
    }

    #[test]
    fn role_predicates_follow_manager_pointer_convention() {
        let tech = AuthUser {
            user_id: Uuid::new_v4(),
            manager_id: Some(Uuid::new_v4()),
        };
        assert!(tech.is_technician());
        assert!(!tech.is_manager());

        let boss = AuthUser {
            user_id: Uuid::new_v4(),
            manager_id: None,
        };
        assert!(boss.is_manager());
        assert!(!boss.is_technician());
    }
}
