use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{validate_limit, validate_port, validate_required};
use super::{
    ApiError, ApiResponse, AppState, NodeCreateRequest, NodeDto, NodeUpdateRequest, PageQuery,
};

/// GET /api/nodes
pub async fn list_nodes(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<NodeDto>>>, ApiError> {
    let limit = validate_limit(page.limit)?;

    let nodes = state.store().nodes().list(page.offset, limit).await?;
    Ok(Json(ApiResponse::success(
        nodes.into_iter().map(NodeDto::from).collect(),
    )))
}

/// POST /api/nodes
pub async fn create_node(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NodeCreateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NodeDto>>), ApiError> {
    validate_required("Name", &payload.name)?;
    validate_required("Address", &payload.address)?;
    validate_required("Protocol", &payload.protocol)?;
    validate_port(payload.port)?;

    let node = state.store().nodes().create(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(NodeDto::from(node))),
    ))
}

/// GET /api/nodes/{id}
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<NodeDto>>, ApiError> {
    let node = state
        .store()
        .nodes()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Node", id))?;

    Ok(Json(ApiResponse::success(NodeDto::from(node))))
}

/// PUT /api/nodes/{id}
pub async fn update_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<NodeUpdateRequest>,
) -> Result<Json<ApiResponse<NodeDto>>, ApiError> {
    if let Some(name) = &payload.name {
        validate_required("Name", name)?;
    }
    if let Some(address) = &payload.address {
        validate_required("Address", address)?;
    }
    if let Some(protocol) = &payload.protocol {
        validate_required("Protocol", protocol)?;
    }
    if let Some(port) = payload.port {
        validate_port(port)?;
    }

    let node = state
        .store()
        .update_node(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Node", id))?;

    Ok(Json(ApiResponse::success(NodeDto::from(node))))
}

/// DELETE /api/nodes/{id}
pub async fn delete_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.store().nodes().delete(id).await? {
        return Err(ApiError::not_found("Node", id));
    }

    tracing::info!(node_id = id, "Deleted node");
    Ok(StatusCode::NO_CONTENT)
}
