use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use refacademy_portal::auth::{Authenticator, Viewer};
use refacademy_portal::config::AppConfig;
use refacademy_portal::gateway::DataGateway;
use refacademy_portal::i18n::TranslationStore;
use refacademy_portal::models::Role;
use refacademy_portal::navigation::{ActiveView, Sidebar};
use refacademy_portal::search::{SearchAggregator, SearchHistory};
use refacademy_portal::storage::{KeyValueStore, ScopedStore};

/// Key for visitors without a live session
const GUEST_VIEW: &str = "guest";

/// Store scope shared by every visitor without a session
const GUEST_SCOPE: &str = "guest";

/// Locally persisted preferences of one user: language, sidebar layout and
/// recent searches. Signed-in users each get their own, guests share one.
pub struct UserSpace {
    pub translations: Arc<TranslationStore>,
    pub sidebar: Sidebar,
    pub history: Arc<SearchHistory>,
    pub aggregator: Arc<SearchAggregator>,
}

impl UserSpace {
    fn load(config: &AppConfig, store: Arc<dyn KeyValueStore>, gateway: Arc<dyn DataGateway>) -> Self {
        let translations = Arc::new(TranslationStore::load(store.clone()));
        let sidebar = Sidebar::load(store.clone());
        let history = Arc::new(SearchHistory::new(store, config.search.history_limit));
        let aggregator = Arc::new(SearchAggregator::new(
            gateway,
            history.clone(),
            config.search.announcement_limit,
        ));
        Self {
            translations,
            sidebar,
            history,
            aggregator,
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub gateway: Arc<dyn DataGateway>,
    pub auth: Authenticator,
    store: Arc<dyn KeyValueStore>,
    /// Loaded user spaces by store scope
    spaces: RwLock<HashMap<String, Arc<UserSpace>>>,
    /// Active tab per live session token
    views: RwLock<HashMap<String, Arc<ActiveView>>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn KeyValueStore>, gateway: Arc<dyn DataGateway>) -> Self {
        let auth = Authenticator::new(gateway.clone());

        Self {
            config,
            gateway,
            auth,
            store,
            spaces: RwLock::new(HashMap::new()),
            views: RwLock::new(HashMap::new()),
        }
    }

    /// Preferences of the viewer, loaded from the store on first use
    pub fn space(&self, viewer: &Viewer) -> Arc<UserSpace> {
        let scope = match &viewer.user_id {
            Some(id) => format!("user:{}", id),
            None => GUEST_SCOPE.to_string(),
        };
        if let Some(space) = self.spaces.read().get(&scope) {
            return space.clone();
        }
        self.spaces
            .write()
            .entry(scope)
            .or_insert_with_key(|scope| {
                tracing::debug!("Loading user space {}", scope);
                let store = Arc::new(ScopedStore::new(self.store.clone(), scope));
                Arc::new(UserSpace::load(&self.config, store, self.gateway.clone()))
            })
            .clone()
    }

    /// Active view of a session, created at the role's landing tab on first use.
    /// Tokens without a live session share the guest view.
    pub fn active_view(&self, token: Option<&str>, role: Role) -> Arc<ActiveView> {
        let key = token
            .filter(|t| self.auth.session(t).is_some())
            .unwrap_or(GUEST_VIEW);
        if let Some(view) = self.views.read().get(key) {
            return view.clone();
        }
        self.views
            .write()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(ActiveView::landing(role)))
            .clone()
    }

    /// Forget the view of an ended session
    pub fn drop_view(&self, token: &str) {
        self.views.write().remove(token);
    }

    /// Drop expired sessions and their views
    pub fn purge_expired(&self) -> usize {
        let purged = self.auth.purge_expired();
        self.views
            .write()
            .retain(|key, _| key == GUEST_VIEW || self.auth.session(key).is_some());
        purged
    }

    #[cfg(test)]
    pub fn view_count(&self) -> usize {
        self.views.read().len()
    }
}
