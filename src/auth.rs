//! Sign-in, sessions and the caller's role
//!
//! Credentials are checked by the backend; the role comes from the caller's
//! `profiles` row. Portal sessions live in memory, keyed by a random token
//! carried in the `session_token` cookie. No session means guest.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{GatewayError, PortalError, PortalResult};
use crate::gateway::{select_as, DataGateway, Query};
use crate::models::{tables, Profile, Role};
use crate::utils::is_valid_email;

pub const SESSION_COOKIE: &str = "session_token";

/// Used when the backend does not report a token lifetime
const DEFAULT_SESSION_SECS: i64 = 7 * 24 * 60 * 60;

/// Who is asking: a signed-in user or a guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Viewer {
    pub user_id: Option<String>,
    pub role: Role,
}

impl Viewer {
    pub fn guest() -> Self {
        Self {
            user_id: None,
            role: Role::Guest,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortalSession {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    access_token: String,
}

impl PortalSession {
    pub fn viewer(&self) -> Viewer {
        Viewer {
            user_id: Some(self.user_id.clone()),
            role: self.role,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

pub struct Authenticator {
    gateway: Arc<dyn DataGateway>,
    sessions: RwLock<HashMap<String, PortalSession>>,
}

impl Authenticator {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Check credentials, look up the role and open a session
    pub async fn sign_in(&self, email: &str, password: &str) -> PortalResult<PortalSession> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(PortalError::validation("email", "invalid email address"));
        }
        if password.is_empty() {
            return Err(PortalError::validation("password", "required"));
        }

        let auth = match self.gateway.sign_in(email, password).await {
            Ok(auth) => auth,
            Err(GatewayError::Unauthorized) => {
                tracing::info!("Failed sign-in for {}", email);
                return Err(PortalError::Unauthenticated);
            }
            Err(e) => return Err(e.into()),
        };

        let query = Query::table(tables::PROFILES).eq("id", &auth.user_id).limit(1);
        let profile = select_as::<Profile>(self.gateway.as_ref(), &query)
            .await?
            .into_iter()
            .next();
        let role = profile.as_ref().map(Profile::role).unwrap_or_default();
        if profile.is_none() {
            tracing::warn!("No profile for user {}, signing in as guest", auth.user_id);
        }

        let lifetime = if auth.expires_in > 0 {
            auth.expires_in
        } else {
            DEFAULT_SESSION_SECS
        };
        let session = PortalSession {
            token: uuid::Uuid::new_v4().to_string(),
            user_id: auth.user_id,
            email: auth.email,
            full_name: profile.and_then(|p| p.full_name),
            role,
            expires_at: Utc::now() + Duration::seconds(lifetime),
            access_token: auth.access_token,
        };
        self.sessions
            .write()
            .insert(session.token.clone(), session.clone());
        tracing::info!("{} signed in as {}", session.email, session.role);
        Ok(session)
    }

    /// End a session. Backend sign-out failures are logged, the local session goes regardless.
    pub async fn sign_out(&self, token: &str) {
        let session = self.sessions.write().remove(token);
        if let Some(session) = session {
            if let Err(e) = self.gateway.sign_out(&session.access_token).await {
                tracing::warn!("Backend sign-out failed for {}: {}", session.email, e);
            }
            tracing::info!("{} signed out", session.email);
        }
    }

    pub async fn request_password_reset(&self, email: &str) -> PortalResult<()> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(PortalError::validation("email", "invalid email address"));
        }
        self.gateway.send_password_reset(email).await?;
        tracing::info!("Password reset requested for {}", email);
        Ok(())
    }

    /// Live session for a token; expired sessions are dropped
    pub fn session(&self, token: &str) -> Option<PortalSession> {
        let session = self.sessions.read().get(token).cloned()?;
        if session.is_expired() {
            self.sessions.write().remove(token);
            tracing::debug!("Session for {} expired", session.email);
            return None;
        }
        Some(session)
    }

    pub fn viewer(&self, token: Option<&str>) -> Viewer {
        token
            .and_then(|t| self.session(t))
            .map(|s| s.viewer())
            .unwrap_or_else(Viewer::guest)
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }
}
