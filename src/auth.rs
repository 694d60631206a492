use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header, request::Parts},
    response::Response,
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    repository::RepositoryState,
};

/// Name of the cookie carrying the session JWT.
pub const SESSION_COOKIE: &str = "session_token";

/// Claims
///
/// Payload of a session JWT, signed with `AppConfig::session_secret`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's id in the `users` table.
    pub sub: Uuid,
    /// Expiration Time (exp): seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// Decodes and validates a session token (signature and expiry).
pub fn decode_session_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

// --- Auth Bridge ---

/// AuthProvider
///
/// The external authentication service. One instance is built at startup and shared
/// read-only; the bridge hands it every `/api/auth/*` request as received.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get(&self, request: Request) -> Response;
    async fn post(&self, request: Request) -> Response;
}

/// AuthState
///
/// Shared handle to the injected auth provider.
pub type AuthState = Arc<dyn AuthProvider>;

/// auth_get
///
/// [Public Route] `GET /api/auth/{*rest}`. Pure delegation: no inspection, no error mapping.
pub async fn auth_get(State(auth): State<AuthState>, request: Request) -> Response {
    auth.get(request).await
}

/// auth_post
///
/// [Public Route] `POST /api/auth/{*rest}`.
pub async fn auth_post(State(auth): State<AuthState>, request: Request) -> Response {
    auth.post(request).await
}

// --- Session Extractor ---

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    /// 'analyst' or 'admin'.
    pub role: String,
}

/// AuthUser Extractor Implementation
///
/// Guards every page route (see `auth_middleware`). Credentials are looked for in order:
/// 1. Local Bypass: `x-user-id` header, only in `Env::Local`.
/// 2. `Authorization: Bearer <jwt>`.
/// 3. The `session_token` cookie set by the sign-in flow.
///
/// The token's subject must still exist in the repository.
///
/// Rejection: `401 Unauthorized` on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // User lookups, for both the bypass and the token subject.
    RepositoryState: FromRef<S>,
    // Session secret and the Env check.
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // 1. Local Development Bypass Check
        // In Env::Local a known user id in `x-user-id` authenticates directly. The id
        // must still resolve to a stored user so the role is real.
        if config.env == Env::Local {
            let bypass_id = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| Uuid::parse_str(value).ok());

            if let Some(user_id) = bypass_id {
                if let Ok(Some(user)) = repo.get_user(user_id).await {
                    return Ok(AuthUser {
                        id: user.id,
                        role: user.role,
                    });
                }
            }
        }

        // Production, or a bypass that did not resolve, falls through to the token flow.

        // 2. Token Extraction: header first (API clients), cookie second (browser).
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_owned())
                .ok_or(StatusCode::UNAUTHORIZED)?,
        };

        // 3. Decode and Validate
        let claims = decode_session_token(&token, &config.session_secret).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("session token expired"),
                _ => tracing::debug!("session token rejected: {}", e),
            }
            StatusCode::UNAUTHORIZED
        })?;

        // 4. Database Lookup
        // A user deleted after the token was issued loses access immediately.
        let user = repo
            .get_user(claims.sub)
            .await
            .map_err(|e| {
                tracing::error!("user lookup failed during authentication: {}", e);
                StatusCode::UNAUTHORIZED
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            id: user.id,
            role: user.role,
        })
    }
}
