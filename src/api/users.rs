use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{
    validate_limit, validate_password, validate_traffic_limit_gb, validate_username,
};
use super::{
    AccountCreateRequest, AccountDto, AccountUpdateRequest, AdminAccount, ApiError, ApiResponse,
    AppState, PageQuery,
};
use crate::db::{Account, StoreError};

async fn load_account(state: &AppState, uuid: &str) -> Result<Account, ApiError> {
    state
        .store()
        .accounts()
        .find_by_uuid(uuid)
        .await?
        .ok_or_else(|| ApiError::not_found("User", uuid))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<AccountDto>>>, ApiError> {
    let limit = validate_limit(page.limit)?;

    let accounts = state.store().accounts().list(page.offset, limit).await?;
    let dtos = accounts.into_iter().map(AccountDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AccountCreateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), ApiError> {
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;
    validate_traffic_limit_gb(payload.traffic_limit_gb)?;

    let username = payload.username.clone();

    let account = match state.store().accounts().create(payload.into()).await {
        Ok(account) => account,
        Err(StoreError::AlreadyExists(_)) => {
            return Err(ApiError::Conflict(format!(
                "Account '{username}' already exists"
            )));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountDto::from(account))),
    ))
}

/// GET /api/users/{uuid}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let account = load_account(&state, &uuid).await?;
    Ok(Json(ApiResponse::success(AccountDto::from(account))))
}

/// PUT /api/users/{uuid}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(AdminAccount(caller)): Extension<AdminAccount>,
    Path(uuid): Path<String>,
    Json(payload): Json<AccountUpdateRequest>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    if let Some(password) = &payload.password {
        validate_password(password)?;
    }
    if let Some(gb) = payload.traffic_limit_gb {
        validate_traffic_limit_gb(gb)?;
    }

    let existing = load_account(&state, &uuid).await?;

    // The panel must always keep at least the caller able to log in
    if existing.id == caller.id
        && (payload.is_admin == Some(false) || payload.is_active == Some(false))
    {
        return Err(ApiError::Conflict(
            "Cannot revoke admin rights or deactivate your own account".to_string(),
        ));
    }

    let account = state
        .store()
        .update_account(existing.id, payload.into())
        .await?
        .ok_or_else(|| ApiError::not_found("User", &uuid))?;

    tracing::info!(account_id = account.id, "Updated account {}", account.username);

    Ok(Json(ApiResponse::success(AccountDto::from(account))))
}

/// DELETE /api/users/{uuid}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(AdminAccount(caller)): Extension<AdminAccount>,
    Path(uuid): Path<String>,
) -> Result<StatusCode, ApiError> {
    let existing = load_account(&state, &uuid).await?;

    if existing.id == caller.id {
        return Err(ApiError::Conflict(
            "Cannot delete your own account".to_string(),
        ));
    }

    if !state.store().accounts().delete(existing.id).await? {
        return Err(ApiError::not_found("User", &uuid));
    }

    tracing::info!(account_id = existing.id, "Deleted account {}", existing.username);
    Ok(StatusCode::NO_CONTENT)
}
