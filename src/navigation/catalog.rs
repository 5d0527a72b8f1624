//! Role-scoped menu catalog
//!
//! Pure functions of (role, translator). The sidebar renders the sections,
//! the search aggregator matches against the flattened item list.

use serde::Serialize;

use crate::i18n::Translator;
use crate::models::{tabs, Role, TabId};

/// One navigable entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuItem {
    pub id: TabId,
    pub label: String,
    pub keywords: Vec<String>,
}

/// Sidebar category grouping a set of items
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuSection {
    pub id: String,
    pub label: String,
    pub items: Vec<MenuItem>,
}

impl MenuItem {
    /// Label or any keyword contains `needle`, which must already be lowercased
    pub fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
            || self.keywords.iter().any(|k| k.to_lowercase().contains(needle))
    }
}

/// Static item definition: tab, label key, keywords
type ItemDef = (&'static str, &'static str, &'static [&'static str]);

const HOME: ItemDef = (tabs::HOME, "tab.home", &["home", "ana sayfa", "anasayfa", "giriş"]);
const ABOUT: ItemDef = (
    tabs::ABOUT,
    "tab.about",
    &["about", "hakkımızda", "akademi", "academy", "montessori", "okul", "school"],
);
const CONTACT: ItemDef = (
    tabs::CONTACT,
    "tab.contact",
    &["contact", "iletişim", "adres", "address", "telefon", "phone", "e-posta"],
);
const INQUIRY: ItemDef = (
    tabs::INQUIRY,
    "tab.inquiry",
    &["inquiry", "ön kayıt", "kayıt", "başvuru", "enrollment", "register"],
);
const TEACHER_APPLICATION: ItemDef = (
    tabs::TEACHER_APPLICATION,
    "tab.teacher_application",
    &["teacher", "öğretmen", "kariyer", "career", "cv", "iş başvurusu", "job"],
);
const LOGIN: ItemDef = (tabs::LOGIN, "tab.login", &["login", "giriş", "sign in", "oturum"]);
const DASHBOARD: ItemDef = (tabs::DASHBOARD, "tab.dashboard", &["dashboard", "panel", "özet", "overview"]);
const USERS: ItemDef = (tabs::USERS, "tab.users", &["users", "kullanıcı", "hesap", "account", "yetki"]);
const CHILDREN: ItemDef = (tabs::CHILDREN, "tab.children", &["children", "çocuk", "öğrenci", "student"]);
const MY_CHILDREN: ItemDef = (tabs::CHILDREN, "tab.my_children", &["children", "çocuk", "öğrenci", "child"]);
const CLASSES: ItemDef = (tabs::CLASSES, "tab.classes", &["classes", "sınıf", "class", "grup"]);
const ANNOUNCEMENTS: ItemDef = (
    tabs::ANNOUNCEMENTS,
    "tab.announcements",
    &["announcements", "duyuru", "haber", "news"],
);
const FEES: ItemDef = (tabs::FEES, "tab.fees", &["fees", "aidat", "ödeme", "payment", "ücret"]);
const REPORTS: ItemDef = (
    tabs::REPORTS,
    "tab.reports",
    &["reports", "rapor", "gelişim", "karne", "progress"],
);
const INQUIRIES: ItemDef = (tabs::INQUIRIES, "tab.inquiries", &["inquiries", "ön kayıt", "başvuru", "aday"]);
const APPLICATIONS: ItemDef = (
    tabs::APPLICATIONS,
    "tab.applications",
    &["applications", "öğretmen başvuru", "cv", "aday öğretmen"],
);
const ATTENDANCE: ItemDef = (tabs::ATTENDANCE, "tab.attendance", &["attendance", "yoklama", "devamsızlık"]);
const COUNSELING: ItemDef = (
    tabs::COUNSELING,
    "tab.counseling",
    &["counseling", "rehberlik", "görüşme", "guidance"],
);
const SETTINGS: ItemDef = (tabs::SETTINGS, "tab.settings", &["settings", "ayarlar", "tercihler"]);

/// Section definitions per role, in display order
fn section_defs(role: Role) -> Vec<(&'static str, Vec<ItemDef>)> {
    match role {
        Role::Admin => vec![
            ("general", vec![DASHBOARD, ABOUT]),
            ("students", vec![CHILDREN, CLASSES, REPORTS, ATTENDANCE]),
            ("communication", vec![ANNOUNCEMENTS, INQUIRIES, APPLICATIONS]),
            ("management", vec![USERS, FEES, SETTINGS]),
        ],
        Role::Teacher => vec![
            ("general", vec![DASHBOARD, ABOUT]),
            ("students", vec![CHILDREN, CLASSES, REPORTS, ATTENDANCE]),
            ("communication", vec![ANNOUNCEMENTS]),
        ],
        Role::Parent => vec![
            ("general", vec![DASHBOARD, ABOUT, CONTACT]),
            ("family", vec![MY_CHILDREN, REPORTS, ANNOUNCEMENTS]),
        ],
        Role::GuidanceCounselor => vec![
            ("general", vec![DASHBOARD, ABOUT]),
            ("students", vec![COUNSELING, REPORTS]),
            ("communication", vec![ANNOUNCEMENTS]),
        ],
        Role::Staff => vec![
            ("general", vec![DASHBOARD, ABOUT]),
            ("communication", vec![ANNOUNCEMENTS, INQUIRIES]),
        ],
        Role::Guest => vec![
            ("school", vec![HOME, ABOUT, CONTACT]),
            ("admissions", vec![INQUIRY, TEACHER_APPLICATION, LOGIN]),
        ],
    }
}

fn build_item((tab, label_key, keywords): ItemDef, translator: &dyn Translator) -> MenuItem {
    MenuItem {
        id: TabId::from(tab),
        label: translator.t(label_key),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// Sidebar tree for a role
pub fn sections_for(role: Role, translator: &dyn Translator) -> Vec<MenuSection> {
    section_defs(role)
        .into_iter()
        .map(|(id, items)| MenuSection {
            id: id.to_string(),
            label: translator.t(&format!("nav.section.{}", id)),
            items: items.into_iter().map(|def| build_item(def, translator)).collect(),
        })
        .collect()
}

/// Flat catalog for a role, in declaration order
pub fn catalog_for(role: Role, translator: &dyn Translator) -> Vec<MenuItem> {
    sections_for(role, translator)
        .into_iter()
        .flat_map(|section| section.items)
        .collect()
}

/// Whether a tab is reachable for the role
pub fn can_access(role: Role, tab: &TabId) -> bool {
    section_defs(role)
        .iter()
        .flat_map(|(_, items)| items.iter())
        .any(|(id, _, _)| *id == tab.as_str())
}

/// Whether the role's sidebar has a section with this id
pub fn has_section(role: Role, section_id: &str) -> bool {
    section_defs(role).iter().any(|(id, _)| *id == section_id)
}

/// Suggestions shown while the search input is empty
pub fn popular_searches(role: Role, translator: &dyn Translator) -> Vec<String> {
    let keys: &[&str] = match role {
        Role::Admin => &["tab.children", "tab.announcements", "tab.fees", "tab.reports"],
        Role::Teacher => &["tab.children", "tab.attendance", "tab.reports"],
        Role::Parent => &["tab.reports", "tab.announcements", "tab.contact"],
        Role::GuidanceCounselor => &["tab.counseling", "tab.reports"],
        Role::Staff => &["tab.announcements", "tab.inquiries"],
        Role::Guest => &["tab.about", "tab.inquiry", "tab.contact"],
    };
    keys.iter().map(|k| translator.t(k)).collect()
}
