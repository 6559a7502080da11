use axum::{
    Form, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::db::Account;
use crate::services::IssuedToken;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// The authenticated administrator, available to handlers behind [`require_admin`].
#[derive(Debug, Clone)]
pub struct AdminAccount(pub Account);

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a valid bearer token for an active administrator.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_bearer(&headers) else {
        return Err(ApiError::Unauthorized("Not authenticated".to_string()));
    };

    let account = state.auth().authorize_admin(token).await?;

    tracing::Span::current().record("user_id", account.id);
    request.extensions_mut().insert(AdminAccount(account));

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("Authorization")?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();

    if token.is_empty() { None } else { Some(token) }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login/token
/// Exchanges form credentials for a bearer token.
pub async fn login_for_access_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<IssuedToken>, ApiError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Err(ApiError::bad_credentials());
    }

    let token = state.auth().login(&form.username, &form.password).await?;
    Ok(Json(token))
}
