//! Search surface: the debounced state machine behind the search modal
//!
//! Closed -> Idle -> Debouncing -> Searching -> Results -> Closed
//!
//! Every input bumps a generation counter. The debounce timer of a superseded
//! input is aborted, and a search that finishes under an old generation is
//! dropped instead of overwriting newer results.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::aggregator::{SearchAggregator, SearchHost, SearchResult};
use super::history::SearchHistory;
use crate::i18n::Translator;
use crate::models::{Role, TabId};
use crate::navigation::popular_searches;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceState {
    Closed,
    Idle,
    Debouncing,
    Searching,
    Results,
}

/// Everything a renderer needs for one frame of the surface
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub state: SurfaceState,
    pub role: Role,
    pub query: String,
    pub generation: u64,
    pub results: Vec<SearchResult>,
    pub history: Vec<String>,
    pub popular: Vec<String>,
}

struct Shared {
    state: SurfaceState,
    role: Role,
    query: String,
    results: Vec<SearchResult>,
    history: Vec<String>,
    popular: Vec<String>,
}

struct SurfaceCore {
    shared: Mutex<Shared>,
    generation: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
    aggregator: Arc<SearchAggregator>,
    history: Arc<SearchHistory>,
    translator: Arc<dyn Translator>,
    host: Arc<dyn SearchHost>,
    debounce: Duration,
    events: watch::Sender<SurfaceSnapshot>,
}

/// Host handed to result actions. Closing through it closes the surface.
struct SurfaceHost {
    core: Weak<SurfaceCore>,
}

impl SearchHost for SurfaceHost {
    fn navigate(&self, destination: &TabId) {
        if let Some(core) = self.core.upgrade() {
            core.host.navigate(destination);
        }
    }

    fn close(&self) {
        if let Some(core) = self.core.upgrade() {
            core.close();
        }
    }
}

pub struct SearchSurface {
    core: Arc<SurfaceCore>,
}

impl SearchSurface {
    pub fn new(
        aggregator: Arc<SearchAggregator>,
        translator: Arc<dyn Translator>,
        host: Arc<dyn SearchHost>,
        debounce: Duration,
    ) -> Self {
        let shared = Shared {
            state: SurfaceState::Closed,
            role: Role::Guest,
            query: String::new(),
            results: Vec::new(),
            history: Vec::new(),
            popular: Vec::new(),
        };
        let (events, _) = watch::channel(snapshot_of(&shared, 0));
        let history = Arc::clone(aggregator.history());
        Self {
            core: Arc::new(SurfaceCore {
                shared: Mutex::new(shared),
                generation: AtomicU64::new(0),
                pending: Mutex::new(None),
                aggregator,
                history,
                translator,
                host,
                debounce,
                events,
            }),
        }
    }

    /// Show the surface for `role`: empty query, history and suggestions loaded
    pub fn open(&self, role: Role) {
        let core = &self.core;
        let mut shared = core.shared.lock();
        core.supersede();
        shared.state = SurfaceState::Idle;
        shared.role = role;
        shared.query.clear();
        shared.results.clear();
        shared.history = core.history.load();
        shared.popular = popular_searches(role, core.translator.as_ref());
        core.publish(&shared);
        tracing::debug!("Search surface opened for {}", role);
    }

    /// New input value. Must be called inside a tokio runtime.
    pub fn input(&self, text: &str) {
        let core = &self.core;
        let mut shared = core.shared.lock();
        if shared.state == SurfaceState::Closed {
            return;
        }
        let generation = core.supersede();
        shared.query = text.to_string();
        shared.results.clear();

        if text.trim().is_empty() {
            shared.state = SurfaceState::Idle;
            shared.history = core.history.load();
            core.publish(&shared);
            return;
        }

        shared.state = SurfaceState::Debouncing;
        core.publish(&shared);

        let task_core = Arc::clone(core);
        let query = text.to_string();
        let role = shared.role;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(task_core.debounce).await;
            SurfaceCore::run(task_core, generation, query, role).await;
        });
        *core.pending.lock() = Some(handle);
    }

    /// Keyboard input; Escape closes
    pub fn key(&self, key: &str) {
        if key == "Escape" {
            self.close();
        }
    }

    pub fn backdrop_click(&self) {
        self.close();
    }

    pub fn close(&self) {
        self.core.close();
    }

    /// Invoke the action of the result at `index`; false if out of range
    pub fn select(&self, index: usize) -> bool {
        let result = self.core.shared.lock().results.get(index).cloned();
        match result {
            Some(result) => {
                result.invoke();
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        let shared = self.core.shared.lock();
        snapshot_of(&shared, self.core.generation.load(Ordering::SeqCst))
    }

    pub fn subscribe(&self) -> watch::Receiver<SurfaceSnapshot> {
        self.core.events.subscribe()
    }

    pub fn state(&self) -> SurfaceState {
        self.core.shared.lock().state
    }
}

impl Drop for SearchSurface {
    fn drop(&mut self) {
        if let Some(handle) = self.core.pending.lock().take() {
            handle.abort();
        }
    }
}

impl SurfaceCore {
    /// Invalidate in-flight work and return the new generation
    fn supersede(&self) -> u64 {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn publish(&self, shared: &Shared) {
        self.events
            .send_replace(snapshot_of(shared, self.generation.load(Ordering::SeqCst)));
    }

    fn close(&self) {
        {
            let mut shared = self.shared.lock();
            if shared.state == SurfaceState::Closed {
                return;
            }
            self.supersede();
            shared.state = SurfaceState::Closed;
            shared.query.clear();
            shared.results.clear();
            self.publish(&shared);
        }
        tracing::debug!("Search surface closed");
        self.host.close();
    }

    async fn run(core: Arc<SurfaceCore>, generation: u64, query: String, role: Role) {
        {
            let mut shared = core.shared.lock();
            if !core.is_current(generation) || shared.state == SurfaceState::Closed {
                return;
            }
            shared.state = SurfaceState::Searching;
            core.publish(&shared);
        }

        let host: Arc<dyn SearchHost> = Arc::new(SurfaceHost {
            core: Arc::downgrade(&core),
        });
        let results = core
            .aggregator
            .search(&query, role, core.translator.as_ref(), host)
            .await;

        let mut shared = core.shared.lock();
        if !core.is_current(generation) || shared.state == SurfaceState::Closed {
            tracing::debug!("Discarding stale results for '{}' (generation {})", query, generation);
            return;
        }
        shared.results = results;
        shared.state = SurfaceState::Results;
        core.publish(&shared);
    }
}

fn snapshot_of(shared: &Shared, generation: u64) -> SurfaceSnapshot {
    SurfaceSnapshot {
        state: shared.state,
        role: shared.role,
        query: shared.query.clone(),
        generation,
        results: shared.results.clone(),
        history: shared.history.clone(),
        popular: shared.popular.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::i18n::Language;
    use crate::models::{tables, tabs};
    use crate::storage::MemoryStore;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct TestHost {
        navigations: Mutex<Vec<TabId>>,
        closes: AtomicUsize,
    }

    impl SearchHost for TestHost {
        fn navigate(&self, destination: &TabId) {
            self.navigations.lock().push(destination.clone());
        }

        fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        gateway: Arc<MemoryGateway>,
        history: Arc<SearchHistory>,
        host: Arc<TestHost>,
        surface: SearchSurface,
    }

    fn fixture() -> Fixture {
        let gateway = Arc::new(MemoryGateway::with_demo_data());
        let history = Arc::new(SearchHistory::new(Arc::new(MemoryStore::new()), 5));
        let aggregator = Arc::new(SearchAggregator::new(gateway.clone(), history.clone(), 5));
        let host = Arc::new(TestHost::default());
        let surface = SearchSurface::new(aggregator, Arc::new(Language::Tr), host.clone(), DEFAULT_DEBOUNCE);
        Fixture {
            gateway,
            history,
            host,
            surface,
        }
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_keystrokes_fire_one_batch() {
        let f = fixture();
        f.surface.open(Role::Admin);

        f.surface.input("a");
        sleep_ms(100).await;
        f.surface.input("ay");
        sleep_ms(100).await;
        f.surface.input("ayş");
        sleep_ms(299).await;
        assert_eq!(f.surface.state(), SurfaceState::Debouncing);
        assert_eq!(f.gateway.select_calls(), 0);

        sleep_ms(2).await;
        // children + announcements, once
        assert_eq!(f.gateway.select_calls(), 2);
        let snapshot = f.surface.snapshot();
        assert_eq!(snapshot.state, SurfaceState::Results);
        assert_eq!(snapshot.query, "ayş");
        assert!(snapshot.results.iter().any(|r| r.id == "child-c-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_ignored_while_closed() {
        let f = fixture();
        f.surface.input("ayşe");
        sleep_ms(500).await;
        assert_eq!(f.surface.state(), SurfaceState::Closed);
        assert_eq!(f.gateway.select_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_returns_to_idle_without_calls() {
        let f = fixture();
        f.history.record("akademi").unwrap();
        f.surface.open(Role::Teacher);
        assert_eq!(f.surface.snapshot().history, vec!["akademi"]);
        assert!(!f.surface.snapshot().popular.is_empty());

        f.surface.input("ay");
        sleep_ms(100).await;
        f.surface.input("   ");
        sleep_ms(1000).await;

        assert_eq!(f.surface.state(), SurfaceState::Idle);
        assert_eq!(f.gateway.select_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_never_overwrites_newer_results() {
        let f = fixture();
        f.gateway.set_delay(tables::CHILDREN, Duration::from_millis(500));
        f.surface.open(Role::Parent);

        f.surface.input("ayş");
        // first search in flight from t=300 until t=800
        sleep_ms(400).await;
        assert_eq!(f.surface.state(), SurfaceState::Searching);

        f.surface.input("elif");
        sleep_ms(2000).await;

        let snapshot = f.surface.snapshot();
        assert_eq!(snapshot.state, SurfaceState::Results);
        assert_eq!(snapshot.query, "elif");
        assert!(snapshot.results.iter().any(|r| r.id == "child-c-3"));
        assert!(!snapshot.results.iter().any(|r| r.id == "child-c-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_and_backdrop_close() {
        let f = fixture();
        f.surface.open(Role::Guest);
        f.surface.key("Enter");
        assert_eq!(f.surface.state(), SurfaceState::Idle);
        f.surface.key("Escape");
        assert_eq!(f.surface.state(), SurfaceState::Closed);
        assert_eq!(f.host.closes.load(Ordering::SeqCst), 1);

        f.surface.open(Role::Guest);
        f.surface.input("akademi");
        f.surface.backdrop_click();
        sleep_ms(1000).await;
        assert_eq!(f.surface.state(), SurfaceState::Closed);
        assert!(f.surface.snapshot().results.is_empty());
        assert_eq!(f.host.closes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selecting_result_navigates_records_and_closes() {
        let f = fixture();
        let mut events = f.surface.subscribe();
        f.surface.open(Role::Guest);
        f.surface.input("akademi");
        sleep_ms(350).await;

        let snapshot = f.surface.snapshot();
        let index = snapshot
            .results
            .iter()
            .position(|r| r.destination.as_str() == tabs::ABOUT)
            .expect("about result");
        assert!(f.surface.select(index));

        assert_eq!(*f.host.navigations.lock(), vec![TabId::from(tabs::ABOUT)]);
        assert_eq!(f.history.load(), vec!["akademi"]);
        assert_eq!(f.surface.state(), SurfaceState::Closed);
        assert_eq!(f.host.closes.load(Ordering::SeqCst), 1);
        assert!(!f.surface.select(0));

        assert!(events.has_changed().unwrap());
        assert_eq!(events.borrow_and_update().state, SurfaceState::Closed);
    }
}
