use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::Cookies;

use refacademy_portal::models::TabId;
use refacademy_portal::navigation::SidebarView;

use super::{api_error, current_viewer, portal_error, session_token, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub section: String,
}

#[derive(Debug, Deserialize)]
pub struct CollapseRequest {
    pub collapsed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub tab: String,
}

fn store_error(e: impl std::fmt::Display) -> super::ApiError {
    tracing::error!("Failed to save sidebar layout: {}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to save sidebar layout")
}

/// GET /api/navigation - sidebar tree for the caller's role
pub async fn get_navigation(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<ApiResponse<SidebarView>> {
    let token = session_token(&cookies);
    let viewer = current_viewer(&state, &cookies);
    let space = state.space(&viewer);
    let active = state.active_view(token.as_deref(), viewer.role).current();
    Json(ApiResponse::success(space.sidebar.view(
        viewer.role,
        space.translations.as_ref(),
        Some(&active),
    )))
}

/// POST /api/navigation/toggle - only sections of the caller's sidebar
pub async fn toggle_section(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<Value> {
    let viewer = current_viewer(&state, &cookies);
    let expanded = state
        .space(&viewer)
        .sidebar
        .toggle_section(viewer.role, &req.section)
        .map_err(portal_error)?;
    Ok(Json(ApiResponse::success(json!({ "section": req.section, "expanded": expanded }))))
}

/// POST /api/navigation/collapse
pub async fn set_collapsed(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<CollapseRequest>,
) -> ApiResult<Value> {
    let viewer = current_viewer(&state, &cookies);
    state
        .space(&viewer)
        .sidebar
        .set_collapsed(req.collapsed)
        .map_err(store_error)?;
    Ok(Json(ApiResponse::success(json!({ "collapsed": req.collapsed }))))
}

/// POST /api/navigation/select
pub async fn select_tab(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<SelectRequest>,
) -> ApiResult<Value> {
    let token = session_token(&cookies);
    let viewer = current_viewer(&state, &cookies);
    let view = state.active_view(token.as_deref(), viewer.role);
    let tab = TabId::new(req.tab);
    state
        .space(&viewer)
        .sidebar
        .select(viewer.role, &tab, |tab| view.set(tab))
        .map_err(portal_error)?;
    Ok(Json(ApiResponse::success(json!({ "active": tab }))))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, call, login};
    use serde_json::{json, Value};

    fn active_items(body: &Value) -> Vec<String> {
        body["data"]["sections"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|s| s["items"].as_array().unwrap().iter())
            .filter(|i| i["active"] == true)
            .map(|i| i["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_guest_navigation_and_select() {
        let (_, app) = app();
        let (_, body, _) = call(&app, "GET", "/api/navigation", None, None).await;
        assert_eq!(body["data"]["role"], "guest");
        assert_eq!(active_items(&body), vec!["home"]);

        let (status, _, _) = call(&app, "POST", "/api/navigation/select", Some(json!({"tab": "users"})), None).await;
        assert_eq!(status, 403);

        let (status, _, _) = call(&app, "POST", "/api/navigation/select", Some(json!({"tab": "contact"})), None).await;
        assert_eq!(status, 200);
        let (_, body, _) = call(&app, "GET", "/api/navigation", None, None).await;
        assert_eq!(active_items(&body), vec!["contact"]);
    }

    #[tokio::test]
    async fn test_admin_toggle_and_collapse() {
        let (_, app) = app();
        let cookie = login(&app, "admin@refakademi.com").await;

        let (_, body, _) = call(&app, "POST", "/api/navigation/toggle", Some(json!({"section": "management"})), Some(&cookie)).await;
        assert_eq!(body["data"]["expanded"], false);
        call(&app, "POST", "/api/navigation/collapse", Some(json!({"collapsed": true})), Some(&cookie)).await;

        let (_, body, _) = call(&app, "GET", "/api/navigation", None, Some(&cookie)).await;
        assert_eq!(body["data"]["collapsed"], true);
        let management = body["data"]["sections"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["id"] == "management")
            .unwrap();
        assert_eq!(management["expanded"], false);
        assert_eq!(active_items(&body), vec!["dashboard"]);
    }

    #[tokio::test]
    async fn test_forged_sessions_and_unknown_sections() {
        let (state, app) = app();
        for i in 0..50 {
            let cookie = format!("session_token=forged-{}", i);
            let (status, body, _) = call(
                &app,
                "POST",
                "/api/navigation/toggle",
                Some(json!({"section": format!("junk-{}", i)})),
                Some(&cookie),
            )
            .await;
            assert_eq!(status, 404);
            assert_eq!(body["code"], 404);
            call(&app, "GET", "/api/navigation", None, Some(&cookie)).await;
        }
        assert_eq!(state.view_count(), 1);

        let (_, body, _) = call(&app, "GET", "/api/navigation", None, None).await;
        let ids: Vec<&str> = body["data"]["sections"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["school", "admissions"]);
    }

    #[tokio::test]
    async fn test_layout_is_per_user() {
        let (_, app) = app();
        let cookie = login(&app, "admin@refakademi.com").await;
        call(&app, "POST", "/api/navigation/collapse", Some(json!({"collapsed": true})), Some(&cookie)).await;

        let (_, body, _) = call(&app, "GET", "/api/navigation", None, None).await;
        assert_eq!(body["data"]["collapsed"], false);
    }
}
