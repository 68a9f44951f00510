use axum::Extension;

use crate::database::accounts::Account;
use crate::middleware::auth::Caller;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/auth/me - profile of the authenticated caller
pub async fn me(Extension(Caller(account)): Extension<Caller>) -> ApiResult<Account> {
    Ok(ApiResponse::success(account))
}
