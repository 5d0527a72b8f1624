//! Backend HTTP client (PostgREST rows, GoTrue auth, object storage)

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{AuthSession, DataGateway, Direction, Filter, Query};
use crate::config::BackendConfig;
use crate::error::GatewayError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

pub struct RestGateway {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl RestGateway {
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let parsed = url::Url::parse(config.url.trim())
            .map_err(|e| GatewayError::NotConfigured(format!("invalid backend url: {}", e)))?;
        if config.anon_key.trim().is_empty() {
            return Err(GatewayError::NotConfigured("anon key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            client,
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }

    /// Public URL of an uploaded object
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            encode_object_path(path)
        )
    }

    fn with_keys(&self, request: reqwest::RequestBuilder, bearer: Option<&str>) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }

    /// Turn a non-success response into a status error carrying the backend message
    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
            })
            .unwrap_or(body);
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Query-string pairs for a row query, PostgREST syntax
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.columns.clone())];
    for filter in &query.filters {
        match filter {
            Filter::Eq(column, value) => params.push((column.clone(), format!("eq.{}", value))),
            Filter::ILike(column, needle) => {
                params.push((column.clone(), format!("ilike.*{}*", escape_like(needle))))
            }
        }
    }
    if let Some((column, direction)) = &query.order {
        let dir = match direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        params.push(("order".to_string(), format!("{}.{}", column, dir)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl DataGateway for RestGateway {
    fn name(&self) -> &str {
        "rest"
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, GatewayError> {
        let request = self
            .client
            .get(self.rest_url(&query.table))
            .query(&query_params(query));
        let response = Self::check(self.with_keys(request, None).send().await?).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, GatewayError> {
        let request = self
            .client
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = Self::check(self.with_keys(request, None).send().await?).await?;
        let mut rows = response.json::<Vec<Value>>().await?;
        Ok(if rows.is_empty() { row } else { rows.swap_remove(0) })
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: bytes::Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket,
            encode_object_path(path)
        );
        let request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data);
        Self::check(self.with_keys(request, None).send().await?).await?;
        tracing::debug!("Uploaded object {}/{}", bucket, path);
        Ok(self.public_url(bucket, path))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let request = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let response = self.with_keys(request, None).send().await?;
        if matches!(response.status().as_u16(), 400 | 401) {
            return Err(GatewayError::Unauthorized);
        }
        let token: TokenResponse = Self::check(response).await?.json().await?;
        Ok(AuthSession {
            user_id: token.user.id,
            email: token.user.email.unwrap_or_else(|| email.to_string()),
            access_token: token.access_token,
            expires_in: token.expires_in,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        let request = self.client.post(self.auth_url("logout"));
        Self::check(self.with_keys(request, Some(access_token)).send().await?).await?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .post(self.auth_url("recover"))
            .json(&json!({ "email": email }));
        Self::check(self.with_keys(request, None).send().await?).await?;
        Ok(())
    }
}
