use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tower_cookies::Cookies;

use refacademy_portal::models::{Child, PeriodicReport};
use refacademy_portal::pages::{children_of, reports_for};
use refacademy_portal::PortalError;

use super::{current_viewer, portal_error, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/reports/children - the signed-in parent's children
pub async fn my_children(State(state): State<Arc<AppState>>, cookies: Cookies) -> ApiResult<Vec<Child>> {
    let viewer = current_viewer(&state, &cookies);
    let parent_id = viewer
        .user_id
        .ok_or_else(|| portal_error(PortalError::Unauthenticated))?;
    let children = children_of(state.gateway.as_ref(), &parent_id)
        .await
        .map_err(portal_error)?;
    Ok(Json(ApiResponse::success(children)))
}

/// GET /api/reports/:child_id
pub async fn child_reports(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path(child_id): Path<String>,
) -> ApiResult<Vec<PeriodicReport>> {
    let viewer = current_viewer(&state, &cookies);
    let reports = reports_for(state.gateway.as_ref(), &viewer, &child_id)
        .await
        .map_err(portal_error)?;
    Ok(Json(ApiResponse::success(reports)))
}
