//! Remote data gateway
//!
//! Thin client interface over the backend-as-a-service: row queries, inserts,
//! object uploads and auth calls. The portal never talks to the backend any
//! other way.
//!
//! Implementations:
//! - `RestGateway`: PostgREST / GoTrue / storage HTTP API over reqwest
//! - `MemoryGateway`: in-process tables for tests and offline demo mode

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::config::BackendConfig;
use crate::error::GatewayError;

pub mod memory;
pub mod rest;

pub use memory::MemoryGateway;
pub use rest::RestGateway;

/// Row filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// column = value
    Eq(String, String),
    /// column contains value, case-insensitive
    ILike(String, String),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Row query against one table
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive substring match on `column`
    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.filters.push(Filter::ILike(column.to_string(), like_needle(needle)));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Authenticated backend session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

/// Backend interface (primitive operations only)
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Gateway name, for logs
    fn name(&self) -> &str;

    /// Fetch rows matching the query
    async fn select(&self, query: &Query) -> Result<Vec<Value>, GatewayError>;

    /// Insert one row, returning the stored representation
    async fn insert(&self, table: &str, row: Value) -> Result<Value, GatewayError>;

    /// Upload an object and return its public URL
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: bytes::Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError>;

    /// Password sign-in
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError>;

    /// Revoke an access token
    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError>;

    /// Dispatch a password-reset email
    async fn send_password_reset(&self, email: &str) -> Result<(), GatewayError>;
}

/// Substring needle as sent to the backend. PostgREST reads `*` in a like
/// pattern as a wildcard and has no escape for it, so it is dropped.
pub fn like_needle(needle: &str) -> String {
    needle.replace('*', "")
}

/// Run a query and decode every row into `T`
pub async fn select_as<T: DeserializeOwned>(
    gateway: &dyn DataGateway,
    query: &Query,
) -> Result<Vec<T>, GatewayError> {
    let rows = gateway.select(query).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(GatewayError::from))
        .collect()
}

/// Build the gateway described by the configuration.
/// An empty backend URL selects the in-memory gateway seeded with demo data.
pub fn build_gateway(config: &BackendConfig) -> Result<Arc<dyn DataGateway>, GatewayError> {
    if config.url.trim().is_empty() {
        tracing::warn!("No backend URL configured, using in-memory gateway with demo data");
        return Ok(Arc::new(MemoryGateway::with_demo_data()));
    }
    let gateway = RestGateway::new(config)?;
    tracing::info!("Using backend at {}", config.url);
    Ok(Arc::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::table("announcements")
            .select("id,title")
            .ilike("title", "tatil")
            .order("created_at", Direction::Desc)
            .limit(5);

        assert_eq!(query.table, "announcements");
        assert_eq!(query.columns, "id,title");
        assert_eq!(query.filters, vec![Filter::ILike("title".into(), "tatil".into())]);
        assert_eq!(query.order, Some(("created_at".to_string(), Direction::Desc)));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_like_needle_drops_wildcards() {
        assert_eq!(like_needle("a*b"), "ab");
        assert_eq!(like_needle("*"), "");
        let query = Query::table("children").ilike("first_name", "*Ay*");
        assert_eq!(query.filters, vec![Filter::ILike("first_name".into(), "Ay".into())]);
    }
}
