//! Navigation: role catalogs, the sidebar and the host's active view

use parking_lot::RwLock;

use crate::models::{tabs, Role, TabId};

pub mod catalog;
pub mod sidebar;

pub use catalog::{can_access, catalog_for, has_section, popular_searches, sections_for, MenuItem, MenuSection};
pub use sidebar::{Sidebar, SidebarView};

/// "Active tab" state held by a host view. Sidebar and search write it.
pub struct ActiveView {
    current: RwLock<TabId>,
}

impl ActiveView {
    pub fn new(initial: TabId) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Landing tab for a role
    pub fn landing(role: Role) -> Self {
        let tab = match role {
            Role::Guest => tabs::HOME,
            _ => tabs::DASHBOARD,
        };
        Self::new(TabId::from(tab))
    }

    pub fn current(&self) -> TabId {
        self.current.read().clone()
    }

    pub fn set(&self, tab: &TabId) {
        tracing::debug!("Active view -> {}", tab);
        *self.current.write() = tab.clone();
    }
}
