use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tower_cookies::Cookies;

use refacademy_portal::pages::{content_page, ContentPage};

use super::{current_viewer, portal_error, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/pages/:page - home, about, contact
pub async fn get_page(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path(page): Path<String>,
) -> ApiResult<ContentPage> {
    let viewer = current_viewer(&state, &cookies);
    let translations = state.space(&viewer).translations.clone();
    let page = content_page(&page, translations.as_ref(), &state.config.school).map_err(portal_error)?;
    Ok(Json(ApiResponse::success(page)))
}
