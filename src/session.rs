use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    auth::{AuthProvider, Claims, SESSION_COOKIE, decode_session_token},
    config::{AppConfig, Env},
    models::User,
    repository::RepositoryState,
};

/// Sign-in endpoint of the credentials provider, as seen from the outer router.
pub const CREDENTIALS_CALLBACK: &str = "/api/auth/callback/credentials";

// Credentials sign-in backed by the `users` table, with the session held in a signed
// JWT cookie. Mounted behind the auth bridge at /api/auth.

/// AuthError
///
/// JSON error body returned by the session endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Credentials sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Active session as reported to the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    pub expires: DateTime<Utc>,
}

/// One entry of `GET /api/auth/providers`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub sign_in_url: &'static str,
}

/// Verifies a plaintext password against a stored PHC hash string.
pub type PasswordCheck = fn(&str, &str) -> bool;

// Valid Argon2id PHC string with the default cost parameters. Matches no password.
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$WVBxkOu7FTExNKJscDGcVQ$sX3zdXjBgD7ol1suRehr3+fP2JAhmUJIHZJAeqNxAU0";

#[derive(Clone)]
struct SessionState {
    repo: RepositoryState,
    config: AppConfig,
    check_password: PasswordCheck,
}

/// SessionAuthProvider
///
/// The production `AuthProvider`. GET and POST requests are dispatched into separate
/// routers so each bridge handler only reaches the endpoints of its own method.
pub struct SessionAuthProvider {
    get_routes: Router,
    post_routes: Router,
}

impl SessionAuthProvider {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self::with_password_check(repo, config, verify_password)
    }

    /// Same as `new`, with the password verification swapped out.
    pub fn with_password_check(
        repo: RepositoryState,
        config: AppConfig,
        check_password: PasswordCheck,
    ) -> Self {
        let state = SessionState {
            repo,
            config,
            check_password,
        };

        let get_routes = Router::new()
            .route("/api/auth/session", get(current_session))
            .route("/api/auth/providers", get(list_providers))
            .with_state(state.clone());

        let post_routes = Router::new()
            .route(CREDENTIALS_CALLBACK, post(sign_in))
            .route("/api/auth/signout", post(sign_out))
            .with_state(state);

        Self {
            get_routes,
            post_routes,
        }
    }
}

async fn dispatch(router: &Router, request: Request) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {})
}

#[async_trait]
impl AuthProvider for SessionAuthProvider {
    async fn get(&self, request: Request) -> Response {
        dispatch(&self.get_routes, request).await
    }

    async fn post(&self, request: Request) -> Response {
        dispatch(&self.post_routes, request).await
    }
}

// --- Endpoints ---

/// POST /api/auth/callback/credentials
async fn sign_in(
    State(state): State<SessionState>,
    jar: CookieJar,
    Json(req): Json<SignInRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AuthError> {
    let credentials = state
        .repo
        .get_credentials(&req.email)
        .await
        .map_err(|e| {
            tracing::error!("Database error during sign-in: {}", e);
            AuthError::internal("Sign-in failed")
        })?;

    // Unknown emails still pay for one Argon2 verification, so response time does not
    // reveal which accounts exist.
    let (user_id, password_hash) = match &credentials {
        Some(c) => (Some(c.id), c.password_hash.as_str()),
        None => (None, UNKNOWN_USER_HASH),
    };
    let password_ok = (state.check_password)(&req.password, password_hash);

    let user_id = match user_id {
        Some(id) if password_ok => id,
        _ => return Err(AuthError::unauthorized("Invalid email or password")),
    };

    let user = state
        .repo
        .get_user(user_id)
        .await
        .map_err(|e| {
            tracing::error!("Database error during sign-in: {}", e);
            AuthError::internal("Sign-in failed")
        })?
        .ok_or_else(|| AuthError::unauthorized("Invalid email or password"))?;

    let (token, expires) = issue_session_token(user.id, &state.config).map_err(|e| {
        tracing::error!("Failed to sign session token: {}", e);
        AuthError::internal("Sign-in failed")
    })?;

    tracing::info!(user_id = %user.id, "signed in");

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.env == Env::Production);

    Ok((jar.add(cookie), Json(SessionResponse { user, expires })))
}

/// POST /api/auth/signout
///
/// Lands on the public sign-in page at `/`.
async fn sign_out(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/"),
    )
}

/// GET /api/auth/session
///
/// `null` when there is no valid session; never an error status.
async fn current_session(
    State(state): State<SessionState>,
    jar: CookieJar,
) -> Json<Option<SessionResponse>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Json(None);
    };

    let Ok(claims) = decode_session_token(cookie.value(), &state.config.session_secret) else {
        return Json(None);
    };

    let user = match state.repo.get_user(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return Json(None),
        Err(e) => {
            tracing::error!("Database error during session check: {}", e);
            return Json(None);
        }
    };

    let expires = DateTime::from_timestamp(claims.exp as i64, 0).unwrap_or_else(Utc::now);
    Json(Some(SessionResponse { user, expires }))
}

/// GET /api/auth/providers
async fn list_providers() -> Json<Vec<ProviderInfo>> {
    Json(vec![ProviderInfo {
        id: "credentials",
        name: "Email and password",
        sign_in_url: CREDENTIALS_CALLBACK,
    }])
}

// --- Tokens & Passwords ---

/// Signs a session JWT for `user_id`, returning it with its expiry.
pub fn issue_session_token(
    user_id: Uuid,
    config: &AppConfig,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let issued_at = Utc::now();
    let expires = issued_at + chrono::Duration::seconds(config.session_ttl_secs as i64);

    let claims = Claims {
        sub: user_id,
        iat: issued_at.timestamp() as usize,
        exp: expires.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )?;

    Ok((token, expires))
}

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks a password against a stored PHC hash string. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("stored password hash is malformed: {}", e);
            false
        }
    }
}
