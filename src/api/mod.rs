pub mod auth;
pub mod forms;
pub mod navigation;
pub mod pages;
pub mod reports;
pub mod search;
pub mod server;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use refacademy_portal::auth::{Viewer, SESSION_COOKIE};
use refacademy_portal::PortalError;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn with_code(code: u16, message: &str) -> Self {
        Self {
            code: code as i32,
            message: message.to_string(),
            data: None,
        }
    }
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ApiResponse::with_code(status.as_u16(), message)))
}

/// Map a library error onto an HTTP status
pub fn portal_error(e: PortalError) -> ApiError {
    let status = match &e {
        PortalError::Validation { .. } => StatusCode::BAD_REQUEST,
        PortalError::Forbidden => StatusCode::FORBIDDEN,
        PortalError::NotFound(_) => StatusCode::NOT_FOUND,
        PortalError::Unauthenticated => StatusCode::UNAUTHORIZED,
        PortalError::Gateway(_) => StatusCode::BAD_GATEWAY,
        PortalError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", e);
    }
    api_error(status, &e.to_string())
}

pub fn session_token(cookies: &Cookies) -> Option<String> {
    cookies.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Caller identity from the session cookie; guest without one
pub fn current_viewer(state: &AppState, cookies: &Cookies) -> Viewer {
    state.auth.viewer(session_token(cookies).as_deref())
}

/// Multipart bodies carry a CV of up to 5 MB plus form fields
const BODY_LIMIT: usize = 6 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/language", get(server::get_language).post(server::set_language))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/me", get(auth::me))
        // Navigation
        .route("/api/navigation", get(navigation::get_navigation))
        .route("/api/navigation/toggle", post(navigation::toggle_section))
        .route("/api/navigation/collapse", post(navigation::set_collapsed))
        .route("/api/navigation/select", post(navigation::select_tab))
        // Search
        .route("/api/search", post(search::search))
        .route("/api/search/history", get(search::history))
        .route("/api/search/popular", get(search::popular))
        .route("/api/search/select", post(search::select_result))
        .route("/api/search/ws", get(search::search_ws))
        // Pages and forms
        .route("/api/pages/:page", get(pages::get_page))
        .route("/api/inquiries", post(forms::submit_inquiry))
        .route("/api/applications", post(forms::submit_application))
        // Reports
        .route("/api/reports/children", get(reports::my_children))
        .route("/api/reports/:child_id", get(reports::child_reports))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
