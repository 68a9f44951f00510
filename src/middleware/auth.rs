use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth;
use crate::database::accounts::{self, Account};
use crate::error::ApiError;
use crate::AppState;

/// Caller identity resolved by the guard, attached to request extensions
/// and consumed explicitly by each handler.
#[derive(Clone, Debug)]
pub struct Caller(pub Account);

/// One message for every authentication failure. Missing header, malformed
/// token, bad signature, expiry and unknown subject are indistinguishable
/// to the caller.
const CREDENTIALS_ERROR: &str = "Could not validate credentials";

fn challenge() -> Response {
    let mut response = ApiError::unauthorized(CREDENTIALS_ERROR).into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer"),
    );
    response
}

/// Authorization guard: bearer token -> validated claims -> stored account.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&headers).ok_or_else(challenge)?;

    let subject_id = auth::validate_token(&state.config.jwt_secret, token)
        .map_err(|_| challenge())?;

    let account = accounts::find_by_id(&state.pool, subject_id)
        .await
        .map_err(|e| ApiError::from(e).into_response())?
        .ok_or_else(challenge)?;

    request.extensions_mut().insert(Caller(account));
    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Secondary guard: reject authenticated callers whose account is inactive.
pub async fn require_active(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<Caller>() {
        Some(Caller(account)) if account.is_active => Ok(next.run(request).await),
        Some(_) => Err(ApiError::bad_request("Inactive account")),
        None => Err(ApiError::unauthorized(CREDENTIALS_ERROR)),
    }
}
