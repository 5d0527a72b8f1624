use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::Cookies;

use refacademy_portal::i18n::Language;

use super::{api_error, current_viewer, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "backend": state.gateway.name(),
    }))
}

/// GET /api/language - the caller's language
pub async fn get_language(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<ApiResponse<Value>> {
    let viewer = current_viewer(&state, &cookies);
    let language = state.space(&viewer).translations.language();
    Json(ApiResponse::success(json!({ "language": language.code() })))
}

#[derive(Debug, Deserialize)]
pub struct SetLanguageRequest {
    pub language: String,
}

/// POST /api/language
pub async fn set_language(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<SetLanguageRequest>,
) -> ApiResult<Value> {
    let language = Language::parse(&req.language)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "unsupported language"))?;
    let viewer = current_viewer(&state, &cookies);
    state.space(&viewer).translations.set_language(language).map_err(|e| {
        tracing::error!("Failed to save language: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to save language")
    })?;
    Ok(Json(ApiResponse::success(json!({ "language": language.code() }))))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, call, login};
    use serde_json::json;

    #[tokio::test]
    async fn test_health() {
        let (_, app) = app();
        let (status, body, _) = call(&app, "GET", "/api/health", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["backend"], "memory");
    }

    #[tokio::test]
    async fn test_language_switch_changes_labels() {
        let (_, app) = app();
        let (_, body, _) = call(&app, "GET", "/api/language", None, None).await;
        assert_eq!(body["data"]["language"], "tr");

        let (status, _, _) = call(&app, "POST", "/api/language", Some(json!({"language": "en"})), None).await;
        assert_eq!(status, 200);
        let (_, page, _) = call(&app, "GET", "/api/pages/about", None, None).await;
        assert_eq!(page["data"]["title"], "About Ref Academy");

        let (status, _, _) = call(&app, "POST", "/api/language", Some(json!({"language": "de"})), None).await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_language_is_per_user() {
        let (_, app) = app();
        let cookie = login(&app, "admin@refakademi.com").await;
        call(&app, "POST", "/api/language", Some(json!({"language": "en"})), Some(&cookie)).await;

        let (_, body, _) = call(&app, "GET", "/api/language", None, Some(&cookie)).await;
        assert_eq!(body["data"]["language"], "en");
        let (_, body, _) = call(&app, "GET", "/api/language", None, None).await;
        assert_eq!(body["data"]["language"], "tr");
    }
}
