use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::subscription::{is_subscription_valid, render_subscription};

const NOT_AVAILABLE: &str = "Subscription not found or expired\n";

/// GET /sub/{uuid}
/// Public plain-text feed. Unknown, inactive and expired accounts are indistinguishable.
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Response, ApiError> {
    let account = state.store().accounts().find_by_uuid(&uuid).await?;

    let Some(account) = account.filter(|a| is_subscription_valid(a, Utc::now())) else {
        return Ok((StatusCode::NOT_FOUND, NOT_AVAILABLE).into_response());
    };

    let nodes = state.store().nodes().list_active().await?;
    metrics::counter!("subscription_fetches_total").increment(1);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_subscription(&account, &nodes),
    )
        .into_response())
}
