//! Collapsible sidebar
//!
//! Layout state (per-section expansion and the whole-sidebar collapse flag) is
//! persisted in the local store. The active tab belongs to the host view and
//! is only passed in for rendering.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::catalog::{can_access, has_section, sections_for};
use crate::error::{PortalError, PortalResult, StoreError};
use crate::i18n::Translator;
use crate::models::{Role, TabId};
use crate::storage::{get_json, keys, set_json, KeyValueStore};

#[derive(Debug, Clone, Serialize)]
pub struct SidebarItem {
    pub id: TabId,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SidebarSection {
    pub id: String,
    pub label: String,
    pub expanded: bool,
    pub items: Vec<SidebarItem>,
}

/// Render-ready sidebar tree
#[derive(Debug, Clone, Serialize)]
pub struct SidebarView {
    pub role: Role,
    pub collapsed: bool,
    pub sections: Vec<SidebarSection>,
}

pub struct Sidebar {
    store: Arc<dyn KeyValueStore>,
    /// section id -> expanded; missing sections are expanded
    expanded: RwLock<HashMap<String, bool>>,
    collapsed: RwLock<bool>,
}

impl Sidebar {
    /// Restore the persisted layout; malformed values fall back to defaults
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let expanded: HashMap<String, bool> =
            get_json(store.as_ref(), keys::SIDEBAR_EXPANDED).unwrap_or_default();
        let collapsed: bool = get_json(store.as_ref(), keys::SIDEBAR_COLLAPSED).unwrap_or(false);
        Self {
            store,
            expanded: RwLock::new(expanded),
            collapsed: RwLock::new(collapsed),
        }
    }

    pub fn is_expanded(&self, section_id: &str) -> bool {
        self.expanded.read().get(section_id).copied().unwrap_or(true)
    }

    pub fn is_collapsed(&self) -> bool {
        *self.collapsed.read()
    }

    /// Flip one of the role's sections, returning its new state
    pub fn toggle_section(&self, role: Role, section_id: &str) -> PortalResult<bool> {
        if !has_section(role, section_id) {
            return Err(PortalError::NotFound(format!("section {}", section_id)));
        }
        let mut expanded = self.expanded.write();
        let now = !expanded.get(section_id).copied().unwrap_or(true);
        expanded.insert(section_id.to_string(), now);
        set_json(self.store.as_ref(), keys::SIDEBAR_EXPANDED, &*expanded)?;
        Ok(now)
    }

    pub fn set_collapsed(&self, collapsed: bool) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), keys::SIDEBAR_COLLAPSED, &collapsed)?;
        *self.collapsed.write() = collapsed;
        Ok(())
    }

    pub fn view(&self, role: Role, translator: &dyn Translator, active: Option<&TabId>) -> SidebarView {
        let sections = sections_for(role, translator)
            .into_iter()
            .map(|section| SidebarSection {
                expanded: self.is_expanded(&section.id),
                items: section
                    .items
                    .into_iter()
                    .map(|item| SidebarItem {
                        active: active == Some(&item.id),
                        id: item.id,
                        label: item.label,
                    })
                    .collect(),
                id: section.id,
                label: section.label,
            })
            .collect();

        SidebarView {
            role,
            collapsed: self.is_collapsed(),
            sections,
        }
    }

    /// Switch the active view through `on_select`.
    /// Tabs outside the role's catalog are rejected.
    pub fn select<F>(&self, role: Role, tab: &TabId, on_select: F) -> PortalResult<()>
    where
        F: FnOnce(&TabId),
    {
        if !can_access(role, tab) {
            tracing::debug!("Sidebar rejected tab {} for role {}", tab, role);
            return Err(PortalError::Forbidden);
        }
        on_select(tab);
        Ok(())
    }
}
