use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};

use refacademy_portal::auth::{PortalSession, SESSION_COOKIE};

use super::{current_viewer, portal_error, session_token, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> ApiResult<PortalSession> {
    let session = state
        .auth
        .sign_in(&req.email, &req.password)
        .await
        .map_err(portal_error)?;

    let mut cookie = Cookie::new(SESSION_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);

    Ok(Json(ApiResponse::success(session)))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<ApiResponse<()>> {
    if let Some(token) = session_token(&cookies) {
        state.auth.sign_out(&token).await;
        state.drop_view(&token);
    }

    // path must match for the browser to drop the cookie
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    cookies.remove(removal);

    Json(ApiResponse::success(()))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<()> {
    state
        .auth
        .request_password_reset(&req.email)
        .await
        .map_err(portal_error)?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /api/auth/me - never 401, guests get role "guest"
pub async fn me(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<ApiResponse<Value>> {
    let session = session_token(&cookies).and_then(|t| state.auth.session(&t));
    let data = match session {
        Some(session) => json!({
            "signed_in": true,
            "role": session.role,
            "email": session.email,
            "full_name": session.full_name,
            "expires_at": session.expires_at,
        }),
        None => json!({
            "signed_in": false,
            "role": current_viewer(&state, &cookies).role,
        }),
    };
    Json(ApiResponse::success(data))
}
