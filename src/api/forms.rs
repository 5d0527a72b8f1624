use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use refacademy_portal::pages::{self, ApplicationForm, CvUpload, InquiryForm};

use super::{api_error, portal_error, ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/inquiries
pub async fn submit_inquiry(
    State(state): State<Arc<AppState>>,
    Json(form): Json<InquiryForm>,
) -> ApiResult<Value> {
    let stored = pages::submit_inquiry(state.gateway.as_ref(), &form)
        .await
        .map_err(portal_error)?;
    Ok(Json(ApiResponse::success(stored)))
}

/// POST /api/applications - multipart form, CV in the "cv" field
pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Value> {
    let bad_request = |_| api_error(StatusCode::BAD_REQUEST, "malformed form data");

    let mut form = ApplicationForm::default();
    let mut cv: Option<CvUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "full_name" => form.full_name = field.text().await.map_err(bad_request)?,
            "email" => form.email = field.text().await.map_err(bad_request)?,
            "phone" => form.phone = field.text().await.map_err(bad_request)?,
            "branch" => form.branch = field.text().await.map_err(bad_request)?,
            "experience_years" => form.experience_years = field.text().await.map_err(bad_request)?,
            "cover_letter" => form.cover_letter = Some(field.text().await.map_err(bad_request)?),
            "cv" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(bad_request)?;
                // an empty file input still sends a nameless part
                if !file_name.is_empty() || !data.is_empty() {
                    cv = Some(CvUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            _ => {}
        }
    }

    let stored = pages::submit_application(state.gateway.as_ref(), &form, cv)
        .await
        .map_err(portal_error)?;
    Ok(Json(ApiResponse::success(stored)))
}
