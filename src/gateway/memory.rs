//! In-process gateway: tables held in memory, same filter semantics as the
//! REST backend. Used for offline demo mode and tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use super::{AuthSession, DataGateway, Direction, Filter, Query};
use crate::error::GatewayError;
use crate::models::tables;

struct DemoUser {
    user_id: String,
    password: String,
}

#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    users: RwLock<HashMap<String, DemoUser>>,
    objects: RwLock<HashMap<String, bytes::Bytes>>,
    /// Tables whose selects and inserts fail, to simulate backend outages
    failing: RwLock<HashSet<String>>,
    /// Artificial latency per table
    delays: RwLock<HashMap<String, Duration>>,
    select_calls: AtomicUsize,
    reset_requests: RwLock<Vec<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a table's rows
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables.write().insert(table.to_string(), rows);
    }

    pub fn add_user(&self, email: &str, password: &str, user_id: &str) {
        self.users.write().insert(
            email.to_lowercase(),
            DemoUser {
                user_id: user_id.to_string(),
                password: password.to_string(),
            },
        );
    }

    pub fn fail_table(&self, table: &str) {
        self.failing.write().insert(table.to_string());
    }

    pub fn set_delay(&self, table: &str, delay: Duration) {
        self.delays.write().insert(table.to_string(), delay);
    }

    /// Number of select calls served so far
    pub fn select_calls(&self) -> usize {
        self.select_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<bytes::Bytes> {
        self.objects.read().get(&format!("{}/{}", bucket, path)).cloned()
    }

    pub fn reset_requests(&self) -> Vec<String> {
        self.reset_requests.read().clone()
    }

    /// Gateway pre-filled with a small demo school
    pub fn with_demo_data() -> Self {
        let gateway = Self::new();

        gateway.add_user("admin@refakademi.com", "demo1234", "u-admin");
        gateway.add_user("ogretmen@refakademi.com", "demo1234", "u-teacher");
        gateway.add_user("veli@refakademi.com", "demo1234", "u-parent");

        gateway.seed(
            tables::PROFILES,
            vec![
                json!({"id": "u-admin", "email": "admin@refakademi.com", "full_name": "Zeynep Arslan", "role": "admin"}),
                json!({"id": "u-teacher", "email": "ogretmen@refakademi.com", "full_name": "Can Öztürk", "role": "teacher"}),
                json!({"id": "u-parent", "email": "veli@refakademi.com", "full_name": "Selin Yılmaz", "role": "parent"}),
            ],
        );
        gateway.seed(
            tables::CHILDREN,
            vec![
                json!({"id": "c-1", "first_name": "Ayşe", "last_name": "Yılmaz", "class_name": "Papatyalar", "parent_id": "u-parent"}),
                json!({"id": "c-2", "first_name": "Mehmet", "last_name": "Demir", "class_name": "Güneşler", "parent_id": "u-other"}),
                json!({"id": "c-3", "first_name": "Elif", "last_name": "Kaya", "class_name": null, "parent_id": "u-parent"}),
            ],
        );
        gateway.seed(
            tables::ANNOUNCEMENTS,
            vec![
                json!({"id": "a-1", "title": "Yarıyıl tatili", "content": "Okulumuz 20 Ocak'ta tatile giriyor.", "created_at": "2026-01-10T09:00:00Z"}),
                json!({"id": "a-2", "title": "Veli toplantısı", "content": "Dönem sonu veli toplantısı.", "created_at": "2026-02-02T09:00:00Z"}),
            ],
        );
        gateway.seed(
            tables::PERIODIC_REPORTS,
            vec![json!({
                "id": "r-1",
                "child_id": "c-1",
                "period": "2025-2026 Güz",
                "year": 2025,
                "summary": "Ayşe pratik yaşam çalışmalarında çok istekli.",
                "areas": [
                    {"name": "Pratik Yaşam", "level": "Gelişiyor", "comment": null},
                    {"name": "Duyusal", "level": "Yeterli", "comment": "Renk tabletlerini sıralıyor."}
                ],
                "teacher_name": "Can Öztürk",
                "created_at": "2026-01-15T10:00:00Z"
            })],
        );

        gateway
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(column, expected) => row
            .get(column)
            .and_then(value_as_text)
            .map(|v| &v == expected)
            .unwrap_or(false),
        Filter::ILike(column, needle) => row
            .get(column)
            .and_then(value_as_text)
            .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}

fn compare(a: &Value, b: &Value, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => value_as_text(x).cmp(&value_as_text(y)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    fn name(&self) -> &str {
        "memory"
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, GatewayError> {
        self.select_calls.fetch_add(1, AtomicOrdering::SeqCst);

        let delay = self.delays.read().get(&query.table).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().contains(&query.table) {
            return Err(GatewayError::Status {
                status: 503,
                message: format!("{} is unavailable", query.table),
            });
        }

        let tables = self.tables.read();
        let rows = tables
            .get(&query.table)
            .ok_or_else(|| GatewayError::UnknownTable(query.table.clone()))?;

        let mut result: Vec<Value> = rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .cloned()
            .collect();

        if let Some((column, direction)) = &query.order {
            result.sort_by(|a, b| {
                let ord = compare(a, b, column);
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            result.truncate(limit);
        }
        Ok(result)
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<Value, GatewayError> {
        if self.failing.read().contains(table) {
            return Err(GatewayError::Status {
                status: 503,
                message: format!("{} is unavailable", table),
            });
        }
        if let Some(obj) = row.as_object_mut() {
            obj.entry("id")
                .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
            obj.entry("created_at")
                .or_insert_with(|| Value::String(chrono::Utc::now().to_rfc3339()));
        }
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: bytes::Bytes,
        _content_type: &str,
    ) -> Result<String, GatewayError> {
        let key = format!("{}/{}", bucket, path);
        self.objects.write().insert(key.clone(), data);
        Ok(format!("memory://{}", key))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let users = self.users.read();
        match users.get(&email.to_lowercase()) {
            Some(user) if user.password == password => Ok(AuthSession {
                user_id: user.user_id.clone(),
                email: email.to_lowercase(),
                access_token: uuid::Uuid::new_v4().to_string(),
                expires_in: 7 * 24 * 60 * 60,
            }),
            _ => Err(GatewayError::Unauthorized),
        }
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        self.reset_requests.write().push(email.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_select_filters_order_limit() {
        let gateway = MemoryGateway::with_demo_data();

        let rows = gateway
            .select(&Query::table(tables::CHILDREN).ilike("first_name", "AYŞ"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "c-1");

        let rows = gateway
            .select(
                &Query::table(tables::ANNOUNCEMENTS)
                    .order("created_at", Direction::Desc)
                    .limit(1),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "a-2");

        let rows = gateway
            .select(&Query::table(tables::CHILDREN).eq("parent_id", "u-parent"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_table_and_unknown_table() {
        let gateway = MemoryGateway::with_demo_data();
        gateway.fail_table(tables::ANNOUNCEMENTS);
        assert!(gateway.select(&Query::table(tables::ANNOUNCEMENTS)).await.is_err());
        assert!(matches!(
            gateway.select(&Query::table("nope")).await,
            Err(GatewayError::UnknownTable(_))
        ));
        assert_eq!(gateway.select_calls(), 2);
    }

    #[tokio::test]
    async fn test_sign_in() {
        let gateway = MemoryGateway::with_demo_data();
        let session = gateway.sign_in("Admin@RefAkademi.com", "demo1234").await.unwrap();
        assert_eq!(session.user_id, "u-admin");
        assert!(matches!(
            gateway.sign_in("admin@refakademi.com", "wrong").await,
            Err(GatewayError::Unauthorized)
        ));
    }
}
