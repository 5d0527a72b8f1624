//! Reference-teacher application with optional CV upload

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::inquiry::{required, valid_email, valid_phone};
use crate::error::{PortalError, PortalResult};
use crate::gateway::DataGateway;
use crate::models::tables;
use crate::utils::{get_ext, non_blank, sanitize_file_name};

pub const MAX_CV_BYTES: usize = 5 * 1024 * 1024;
pub const CV_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];
pub const MAX_EXPERIENCE_YEARS: u32 = 60;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Teaching branch, e.g. "Montessori 3-6"
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub experience_years: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// Uploaded CV file
#[derive(Debug, Clone)]
pub struct CvUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub branch: String,
    pub experience_years: u32,
    pub cover_letter: Option<String>,
}

impl ApplicationForm {
    pub fn validate(&self) -> PortalResult<Application> {
        let experience = required("experience_years", &self.experience_years)?;
        let experience_years = experience
            .parse::<u32>()
            .ok()
            .filter(|years| *years <= MAX_EXPERIENCE_YEARS)
            .ok_or_else(|| {
                PortalError::validation(
                    "experience_years",
                    format!("must be a whole number between 0 and {}", MAX_EXPERIENCE_YEARS),
                )
            })?;

        Ok(Application {
            full_name: required("full_name", &self.full_name)?,
            email: valid_email("email", &self.email)?,
            phone: valid_phone("phone", &self.phone)?,
            branch: required("branch", &self.branch)?,
            experience_years,
            cover_letter: non_blank(self.cover_letter.as_deref()),
        })
    }
}

impl CvUpload {
    /// Size and type checks; returns the content type to upload with
    pub fn validate(&self) -> PortalResult<String> {
        if self.data.is_empty() {
            return Err(PortalError::validation("cv", "file is empty"));
        }
        if self.data.len() > MAX_CV_BYTES {
            return Err(PortalError::validation("cv", "file is larger than 5 MB"));
        }
        let ext = get_ext(&self.file_name);
        if !CV_EXTENSIONS.contains(&ext.as_str()) {
            return Err(PortalError::validation("cv", "only pdf, doc and docx files are accepted"));
        }
        let content_type = self
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&self.file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        Ok(content_type)
    }

    /// Object path inside the applications bucket
    pub fn object_path(&self) -> String {
        format!("cv/{}-{}", uuid::Uuid::new_v4(), sanitize_file_name(&self.file_name))
    }
}

/// Validate, upload the CV if present, and store the application row
pub async fn submit_application(
    gateway: &dyn DataGateway,
    form: &ApplicationForm,
    cv: Option<CvUpload>,
) -> PortalResult<Value> {
    let application = form.validate()?;

    let (cv_url, cv_path) = match cv {
        Some(cv) => {
            let content_type = cv.validate()?;
            let path = cv.object_path();
            let url = gateway
                .upload(tables::APPLICATIONS_BUCKET, &path, cv.data, &content_type)
                .await?;
            tracing::debug!("Uploaded CV to {}/{}", tables::APPLICATIONS_BUCKET, path);
            (Some(url), Some(path))
        }
        None => (None, None),
    };

    let row = json!({
        "full_name": application.full_name,
        "email": application.email,
        "phone": application.phone,
        "branch": application.branch,
        "experience_years": application.experience_years,
        "cover_letter": application.cover_letter,
        "cv_url": cv_url,
        "status": "pending",
        "created_at": Utc::now().to_rfc3339(),
    });
    let stored = match gateway.insert(tables::TEACHER_APPLICATIONS, row).await {
        Ok(stored) => stored,
        Err(e) => {
            if let Some(path) = &cv_path {
                tracing::warn!(
                    "Application from {} not saved, orphaned CV at {}/{}: {}",
                    application.email,
                    tables::APPLICATIONS_BUCKET,
                    path,
                    e
                );
            }
            return Err(e.into());
        }
    };
    tracing::info!("New teacher application from {}", application.email);
    Ok(stored)
}
