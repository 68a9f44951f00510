//! Public authentication endpoints: registration and token issuance.

use axum::{extract::State, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::database::accounts::{self, Account, NewAccount};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

/// One generic message for every credential failure: unknown email and wrong
/// password are indistinguishable to the caller.
const LOGIN_ERROR: &str = "Incorrect email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    #[serde(default = "default_language")]
    pub language_preference: String,
    pub password: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/register - create a new account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Account> {
    validate_email_format(&req.email)?;
    if req.phone.trim().is_empty() {
        return Err(ApiError::bad_request("Phone cannot be empty"));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if accounts::email_or_phone_taken(&state.pool, &req.email, &req.phone).await? {
        return Err(ApiError::bad_request("Email or phone already registered"));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let fields = NewAccount {
        email: req.email,
        phone: req.phone,
        full_name: req.full_name,
        language_preference: req.language_preference,
    };

    let account = accounts::create(&state.pool, &fields, &password_hash).await?;
    tracing::info!("Registered account {} ({})", account.id, account.email);

    Ok(ApiResponse::created(account))
}

/// POST /api/auth/token - login with email and password, receive bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let account = accounts::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(LOGIN_ERROR))?;

    if !auth::verify_password(&req.password, &account.password_hash)? {
        return Err(ApiError::unauthorized(LOGIN_ERROR));
    }

    let token = auth::issue_token(
        &state.config.jwt_secret,
        account.id,
        Duration::minutes(state.config.token_ttl_minutes),
    )?;

    Ok(ApiResponse::success(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

fn validate_email_format(email: &str) -> Result<(), ApiError> {
    let parts: Vec<&str> = email.split('@').collect();
    let valid = parts.len() == 2
        && !parts[0].is_empty()
        && parts[1].contains('.')
        && !parts[1].starts_with('.')
        && !parts[1].ends_with('.');

    if valid {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid email format"))
    }
}
