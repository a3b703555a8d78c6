//! Account routes: signup, email verification, login, password reset, logout.

use axum::body::Bytes;
use axum::extract::{FromRef, State};
use axum::http::header::{AUTHORIZATION, REFERRER_POLICY};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use super::envelope;
use crate::services::email_verification::{self, VerificationError};
use crate::services::password::PasswordError;
use crate::services::password_reset::{self, ResetError};
use crate::services::users::{self, NewUser, User, UserError};
use crate::services::validation::Validator;
use crate::services::{format_unix, session, unix_now};
use crate::state::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
const REFERRER_POLICY_VALUE: &str = "strict-origin";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Session token from the `access_token` cookie, or from an
/// `Authorization: Bearer` header when the cookie is absent.
pub(crate) fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_owned());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Authenticated user. Use as a handler parameter to require a session.
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token(&parts.headers) else {
            return Err(envelope::error(StatusCode::UNAUTHORIZED, "missing access token"));
        };

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, &token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                envelope::internal_error()
            })?
            .ok_or_else(|| envelope::error(StatusCode::UNAUTHORIZED, "invalid token"))?;

        Ok(Self { user, token })
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_verified: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email_verified: user.email_verified,
            last_login_at: user.last_login_at.map(format_unix),
            created_at: format_unix(user.created_at),
            updated_at: format_unix(user.updated_at),
        }
    }
}

pub(crate) fn user_error_status(err: &UserError) -> StatusCode {
    match err {
        UserError::Exists | UserError::Password(PasswordError::Weak | PasswordError::Compromised) => {
            StatusCode::BAD_REQUEST
        }
        UserError::NotFound | UserError::IncorrectPassword => StatusCode::UNAUTHORIZED,
        UserError::ReusingPassword => StatusCode::FORBIDDEN,
        UserError::Password(_) | UserError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn user_error_response(err: UserError) -> Response {
    let status = user_error_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "user operation failed");
        return envelope::internal_error();
    }
    tracing::info!(error = %err, "user request rejected");
    envelope::error(status, &err.to_string())
}

pub(crate) fn reset_error_response(err: ResetError) -> Response {
    match err {
        ResetError::UserNotFound | ResetError::InvalidToken => {
            tracing::info!(error = %err, "password reset rejected");
            envelope::error(StatusCode::BAD_REQUEST, &err.to_string())
        }
        ResetError::User(e) => user_error_response(e),
        ResetError::Db(_) | ResetError::Mail(_) => {
            tracing::error!(error = %err, "password reset failed");
            envelope::internal_error()
        }
    }
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(session::SESSION_TTL_SECS))
        .build()
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

/// `POST /api/auth/signup`: create an account and mail a verification code.
pub async fn signup(State(state): State<AppState>, body: Bytes) -> Response {
    let req: SignupRequest = match envelope::decode(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let mut v = Validator::default();
    v.field("email", &req.email).required().email();
    v.field("password", &req.password).required().min_len(8).max_len(50).password();
    v.field("first_name", &req.first_name).required();
    v.field("last_name", &req.last_name).required();
    if let Err(list) = v.finish() {
        return envelope::field_errors(list);
    }

    let new_user = NewUser {
        email: &req.email,
        password: &req.password,
        first_name: &req.first_name,
        last_name: &req.last_name,
    };
    let user = match users::create_user(&state.pool, &state.passwords, new_user).await {
        Ok(u) => u,
        Err(e) => return user_error_response(e),
    };

    if let Err(e) = email_verification::start_verification(&state.pool, state.mailer.as_ref(), &user.id, &user.email).await {
        tracing::error!(error = %e, email = %user.email, "verification start failed");
        return envelope::internal_error();
    }

    tracing::info!(user_id = %user.id, "user signed up");
    envelope::data(StatusCode::CREATED, UserResponse::from(&user))
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct VerifyEmailRequest {
    email: String,
    code: String,
}

#[derive(Serialize)]
struct VerifiedResponse {
    id: String,
    email: String,
    email_verified: bool,
}

/// `POST /api/auth/email-verification`: consume a mailed code.
pub async fn verify_email(State(state): State<AppState>, body: Bytes) -> Response {
    let req: VerifyEmailRequest = match envelope::decode(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let mut v = Validator::default();
    v.field("email", &req.email).required().email();
    v.field("code", &req.code).required().exact_len(email_verification::CODE_LEN).alphanumeric();
    if let Err(list) = v.finish() {
        return envelope::field_errors(list);
    }

    let user = match users::find_by_email(&state.pool, &req.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return envelope::error(StatusCode::NOT_FOUND, "no pending verification found for that account");
        }
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return envelope::internal_error();
        }
    };

    let already = match email_verification::has_completed(&state.pool, &user.id, &user.email).await {
        Ok(done) => done || user.email_verified,
        Err(e) => {
            tracing::error!(error = %e, "verification lookup failed");
            return envelope::internal_error();
        }
    };
    if already {
        return envelope::error(StatusCode::ALREADY_REPORTED, "email already verified");
    }

    match email_verification::complete_verification(&state.pool, state.mailer.as_ref(), &user, &req.code).await {
        Ok(()) => envelope::data(
            StatusCode::OK,
            VerifiedResponse { id: user.id, email: user.email, email_verified: true },
        ),
        Err(VerificationError::InvalidCode) => {
            tracing::info!(email = %user.email, "invalid verification code");
            envelope::error(StatusCode::BAD_REQUEST, "code is invalid")
        }
        Err(e) => {
            tracing::error!(error = %e, "verification failed");
            envelope::internal_error()
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    access_token: String,
    user: UserResponse,
}

/// `POST /api/auth/login`: start a session and set the `access_token` cookie.
pub async fn login(State(state): State<AppState>, jar: CookieJar, body: Bytes) -> Response {
    let req: LoginRequest = match envelope::decode(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let mut v = Validator::default();
    v.field("email", &req.email).required().email();
    v.field("password", &req.password).required();
    if let Err(list) = v.finish() {
        return envelope::field_errors(list);
    }

    let mut user = match users::authenticate(&state.pool, &req.email, &req.password).await {
        Ok(u) => u,
        Err(UserError::NotFound | UserError::IncorrectPassword) => {
            tracing::info!(email = %req.email, "login rejected");
            return envelope::error(StatusCode::UNAUTHORIZED, "Incorrect username or password");
        }
        Err(e) => return user_error_response(e),
    };

    if !user.email_verified {
        if let Err(e) = email_verification::start_verification(&state.pool, state.mailer.as_ref(), &user.id, &user.email).await {
            tracing::error!(error = %e, email = %user.email, "verification restart failed");
            return envelope::internal_error();
        }
        return envelope::error(StatusCode::FORBIDDEN, "You must verify your email to continue");
    }

    let token = match session::create_session(&state.pool, &user.id).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            return envelope::internal_error();
        }
    };

    let now = unix_now();
    if let Err(e) = users::record_login(&state.pool, &user.id, now).await {
        tracing::warn!(error = %e, user_id = %user.id, "failed to record login time");
    } else {
        user.last_login_at = Some(now);
        user.updated_at = now;
    }

    tracing::info!(user_id = %user.id, "user logged in");
    let jar = jar.add(session_cookie(token.clone(), state.cookie_secure));
    let body = LoginResponse { access_token: token, user: UserResponse::from(&user) };
    (jar, [(REFERRER_POLICY, REFERRER_POLICY_VALUE)], envelope::data(StatusCode::OK, body)).into_response()
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct StartResetRequest {
    email: String,
}

#[derive(Serialize)]
struct StartResetResponse {
    expires_at: String,
}

/// `POST /api/auth/password-reset/start`: mail a reset token.
pub async fn start_password_reset(State(state): State<AppState>, body: Bytes) -> Response {
    let req: StartResetRequest = match envelope::decode(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let mut v = Validator::default();
    v.field("email", &req.email).required().email();
    if let Err(list) = v.finish() {
        return envelope::field_errors(list);
    }

    match password_reset::start_reset(&state.pool, state.mailer.as_ref(), &req.email).await {
        Ok(expires_at) => {
            envelope::data(StatusCode::OK, StartResetResponse { expires_at: format_unix(expires_at) })
        }
        Err(e) => reset_error_response(e),
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    token: String,
    password: String,
}

/// `POST /api/auth/password-reset`: set a new password from a mailed token.
pub async fn reset_password(State(state): State<AppState>, body: Bytes) -> Response {
    let req: ResetPasswordRequest = match envelope::decode(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let mut v = Validator::default();
    v.field("token", &req.token).required();
    v.field("password", &req.password).required().min_len(8).max_len(50).password();
    if let Err(list) = v.finish() {
        return envelope::field_errors(list);
    }

    match password_reset::finish_reset(&state.pool, &state.passwords, state.mailer.as_ref(), &req.token, &req.password)
        .await
    {
        Ok(_) => (
            [(REFERRER_POLICY, REFERRER_POLICY_VALUE)],
            envelope::data(StatusCode::OK, serde_json::json!({})),
        )
            .into_response(),
        Err(e) => reset_error_response(e),
    }
}

/// `POST /api/auth/logout`: delete the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser, jar: CookieJar) -> Response {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::error!(error = %e, "session delete failed");
        return envelope::internal_error();
    }

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure)
        .max_age(Duration::ZERO);

    tracing::info!(user_id = %auth.user.id, "user logged out");
    (jar.add(cookie), StatusCode::NO_CONTENT).into_response()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
