//! Role-aware search aggregator
//!
//! Merges three sources, in this order:
//! 1. the role's static menu catalog (label / keyword substring match)
//! 2. children whose first name contains the query (admin, teacher, parent)
//! 3. announcements whose title contains the query (admin, teacher), max 5
//!
//! Remote failures are logged and contribute nothing; search never errors.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::history::SearchHistory;
use crate::gateway::{like_needle, select_as, DataGateway, Direction, Query};
use crate::i18n::Translator;
use crate::models::{tables, tabs, Announcement, Child, Role, TabId};
use crate::navigation::sections_for;

/// Callbacks supplied by the view hosting the search surface
pub trait SearchHost: Send + Sync {
    /// Switch the host's active view
    fn navigate(&self, destination: &TabId);
    /// Dismiss the search surface
    fn close(&self);
}

pub type ResultAction = Arc<dyn Fn() + Send + Sync>;

/// One navigable hit
#[derive(Clone, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub destination: TabId,
    #[serde(skip)]
    action: ResultAction,
}

impl SearchResult {
    /// Navigate, remember the query, close the surface
    pub fn invoke(&self) {
        (self.action)()
    }
}

impl fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("destination", &self.destination)
            .finish()
    }
}

const CHILD_COLUMNS: &str = "id,first_name,last_name,class_name,parent_id";
const ANNOUNCEMENT_COLUMNS: &str = "id,title,content,created_at";
const DESCRIPTION_MAX_CHARS: usize = 80;

pub struct SearchAggregator {
    gateway: Arc<dyn DataGateway>,
    history: Arc<SearchHistory>,
    announcement_limit: usize,
}

impl SearchAggregator {
    pub fn new(gateway: Arc<dyn DataGateway>, history: Arc<SearchHistory>, announcement_limit: usize) -> Self {
        Self {
            gateway,
            history,
            announcement_limit,
        }
    }

    pub fn history(&self) -> &Arc<SearchHistory> {
        &self.history
    }

    /// Ordered results for `query` as seen by `role`
    pub async fn search(
        &self,
        query: &str,
        role: Role,
        translator: &dyn Translator,
        host: Arc<dyn SearchHost>,
    ) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        let page_category = translator.t("search.category.page");
        let mut results: Vec<SearchResult> = Vec::new();
        for section in sections_for(role, translator) {
            for item in section.items.into_iter().filter(|item| item.matches(&needle)) {
                results.push(SearchResult {
                    id: format!("page-{}", item.id),
                    title: item.label,
                    description: section.label.clone(),
                    category: page_category.clone(),
                    action: self.action(&host, query, &item.id),
                    destination: item.id,
                });
            }
        }

        // a query of wildcards only would match every remote row
        let (children, announcements) = if like_needle(query).trim().is_empty() {
            (Vec::new(), Vec::new())
        } else {
            futures::join!(self.find_children(query, role), self.find_announcements(query, role))
        };

        let children_dest = TabId::from(tabs::CHILDREN);
        let child_category = translator.t("search.category.children");
        for child in children {
            results.push(SearchResult {
                id: format!("child-{}", child.id),
                title: child.display_name(),
                description: child
                    .class_name
                    .clone()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| translator.t("search.no_class")),
                category: child_category.clone(),
                destination: children_dest.clone(),
                action: self.action(&host, query, &children_dest),
            });
        }

        let announcements_dest = TabId::from(tabs::ANNOUNCEMENTS);
        let announcement_category = translator.t("search.category.announcements");
        for announcement in announcements {
            let description = announcement
                .content
                .as_deref()
                .map(|c| truncate_chars(c.trim(), DESCRIPTION_MAX_CHARS))
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| translator.t("search.announcement_description"));
            results.push(SearchResult {
                id: format!("announcement-{}", announcement.id),
                title: announcement.title,
                description,
                category: announcement_category.clone(),
                destination: announcements_dest.clone(),
                action: self.action(&host, query, &announcements_dest),
            });
        }

        tracing::debug!("Search '{}' as {} -> {} results", query, role, results.len());
        results
    }

    async fn find_children(&self, query: &str, role: Role) -> Vec<Child> {
        if !role.searches_children() {
            return Vec::new();
        }
        let q = Query::table(tables::CHILDREN)
            .select(CHILD_COLUMNS)
            .ilike("first_name", query);
        match select_as::<Child>(self.gateway.as_ref(), &q).await {
            Ok(children) => children,
            Err(e) => {
                tracing::warn!("Children search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    async fn find_announcements(&self, query: &str, role: Role) -> Vec<Announcement> {
        if !role.searches_announcements() {
            return Vec::new();
        }
        let q = Query::table(tables::ANNOUNCEMENTS)
            .select(ANNOUNCEMENT_COLUMNS)
            .ilike("title", query)
            .order("created_at", Direction::Desc)
            .limit(self.announcement_limit);
        match select_as::<Announcement>(self.gateway.as_ref(), &q).await {
            Ok(mut announcements) => {
                announcements.truncate(self.announcement_limit);
                announcements
            }
            Err(e) => {
                tracing::warn!("Announcement search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    fn action(&self, host: &Arc<dyn SearchHost>, query: &str, destination: &TabId) -> ResultAction {
        let host = Arc::clone(host);
        let history = Arc::clone(&self.history);
        let query = query.to_string();
        let destination = destination.clone();
        Arc::new(move || {
            host.navigate(&destination);
            if let Err(e) = history.record(&query) {
                tracing::warn!("Failed to save recent search '{}': {}", query, e);
            }
            host.close();
        })
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::i18n::Language;
    use crate::storage::MemoryStore;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingHost {
        navigations: Mutex<Vec<TabId>>,
        closes: AtomicUsize,
    }

    impl SearchHost for RecordingHost {
        fn navigate(&self, destination: &TabId) {
            self.navigations.lock().push(destination.clone());
        }

        fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn setup() -> (Arc<MemoryGateway>, SearchAggregator, Arc<RecordingHost>) {
        let gateway = Arc::new(MemoryGateway::with_demo_data());
        let history = Arc::new(SearchHistory::new(Arc::new(MemoryStore::new()), 5));
        let aggregator = SearchAggregator::new(gateway.clone(), history, 5);
        (gateway, aggregator, Arc::new(RecordingHost::default()))
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_calls() {
        let (gateway, aggregator, host) = setup();
        for q in ["", "   ", "\t\n"] {
            let results = aggregator.search(q, Role::Admin, &Language::Tr, host.clone()).await;
            assert!(results.is_empty());
        }
        assert_eq!(gateway.select_calls(), 0);
    }

    #[tokio::test]
    async fn test_guest_sees_academy_but_no_admin_pages() {
        let (gateway, aggregator, host) = setup();
        let results = aggregator.search("akademi", Role::Guest, &Language::Tr, host).await;

        assert!(results.iter().any(|r| r.destination.as_str() == tabs::ABOUT));
        assert!(!results.iter().any(|r| r.destination.as_str() == tabs::USERS));
        assert!(!results.iter().any(|r| r.destination.as_str() == tabs::FEES));
        assert_eq!(gateway.select_calls(), 0);
    }

    #[tokio::test]
    async fn test_child_match_navigates_to_children() {
        let (_gateway, aggregator, host) = setup();
        let results = aggregator.search("AYŞ", Role::Admin, &Language::Tr, host.clone()).await;

        let child = results
            .iter()
            .find(|r| r.id == "child-c-1")
            .expect("child result");
        assert_eq!(child.title, "Ayşe Yılmaz");
        assert_eq!(child.description, "Papatyalar");
        assert_eq!(child.destination.as_str(), tabs::CHILDREN);

        child.invoke();
        assert_eq!(*host.navigations.lock(), vec![TabId::from(tabs::CHILDREN)]);
        assert_eq!(host.closes.load(Ordering::SeqCst), 1);
        assert_eq!(aggregator.history().load(), vec!["AYŞ"]);
    }

    #[tokio::test]
    async fn test_failing_announcements_keep_catalog_results() {
        let (gateway, aggregator, host) = setup();
        gateway.fail_table(tables::ANNOUNCEMENTS);

        let results = aggregator.search("duyuru", Role::Teacher, &Language::Tr, host).await;
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "page-announcements");
        assert!(results.iter().all(|r| !r.id.starts_with("announcement-")));
    }

    #[tokio::test]
    async fn test_failing_children_keep_other_sources() {
        let (gateway, aggregator, host) = setup();
        gateway.fail_table(tables::CHILDREN);

        let results = aggregator.search("el", Role::Admin, &Language::Tr, host.clone()).await;
        assert!(results.iter().any(|r| r.id.starts_with("page-")));
        assert!(results.iter().any(|r| r.id.starts_with("announcement-")));
        assert!(results.iter().all(|r| !r.id.starts_with("child-")));

        let results = aggregator.search("el", Role::Parent, &Language::Tr, host).await;
        assert!(results.iter().any(|r| r.id == "page-reports"));
        assert!(results.iter().all(|r| r.id.starts_with("page-")));
        assert_eq!(gateway.select_calls(), 3);
    }

    #[tokio::test]
    async fn test_both_sources_failing_still_returns_catalog() {
        let (gateway, aggregator, host) = setup();
        gateway.fail_table(tables::CHILDREN);
        gateway.fail_table(tables::ANNOUNCEMENTS);

        let results = aggregator.search("el", Role::Admin, &Language::Tr, host).await;
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.id.starts_with("page-")));
        assert_eq!(gateway.select_calls(), 2);
    }

    #[tokio::test]
    async fn test_wildcard_query_skips_remote_sources() {
        let (gateway, aggregator, host) = setup();
        for q in ["*", " ** "] {
            let results = aggregator.search(q, Role::Admin, &Language::Tr, host.clone()).await;
            assert!(results.is_empty());
        }
        assert_eq!(gateway.select_calls(), 0);

        let results = aggregator.search("Ay*", Role::Admin, &Language::Tr, host).await;
        assert!(results.iter().any(|r| r.id == "child-c-1"));
    }

    #[tokio::test]
    async fn test_sources_are_concatenated_in_order() {
        let (_gateway, aggregator, host) = setup();
        let results = aggregator.search("el", Role::Admin, &Language::Tr, host).await;

        let rank = |r: &SearchResult| {
            if r.id.starts_with("page-") {
                0
            } else if r.id.starts_with("child-") {
                1
            } else {
                2
            }
        };
        let ranks: Vec<u8> = results.iter().map(rank).collect();
        assert!(ranks.contains(&0) && ranks.contains(&1) && ranks.contains(&2));
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_role_scopes_remote_sources() {
        let (gateway, aggregator, host) = setup();

        aggregator.search("ay", Role::Parent, &Language::Tr, host.clone()).await;
        assert_eq!(gateway.select_calls(), 1);

        aggregator.search("ay", Role::Staff, &Language::Tr, host.clone()).await;
        aggregator.search("ay", Role::GuidanceCounselor, &Language::Tr, host.clone()).await;
        assert_eq!(gateway.select_calls(), 1);

        aggregator.search("ay", Role::Teacher, &Language::Tr, host).await;
        assert_eq!(gateway.select_calls(), 3);
    }

    #[tokio::test]
    async fn test_announcements_capped() {
        let (gateway, aggregator, host) = setup();
        let rows = (0..8)
            .map(|i| json!({"id": format!("n-{}", i), "title": format!("Gezi {}", i), "created_at": format!("2026-03-0{}T00:00:00Z", i + 1)}))
            .collect();
        gateway.seed(tables::ANNOUNCEMENTS, rows);

        let results = aggregator.search("gezi", Role::Admin, &Language::En, host).await;
        let hits: Vec<&SearchResult> = results.iter().filter(|r| r.id.starts_with("announcement-")).collect();
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].title, "Gezi 7");
        assert_eq!(hits[0].description, "View announcement");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("kısa", 10), "kısa");
        assert_eq!(truncate_chars("çok uzun metin", 3), "çok…");
    }
}
