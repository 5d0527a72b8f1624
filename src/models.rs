use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller access class. Unknown values fall back to `Guest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
    Parent,
    GuidanceCounselor,
    Staff,
    Guest,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Teacher,
        Role::Parent,
        Role::GuidanceCounselor,
        Role::Staff,
        Role::Guest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
            Role::GuidanceCounselor => "guidance_counselor",
            Role::Staff => "staff",
            Role::Guest => "guest",
        }
    }

    /// Roles whose search includes the children table
    pub fn searches_children(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher | Role::Parent)
    }

    /// Roles whose search includes the announcements table
    pub fn searches_announcements(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }

    /// Roles allowed to read any child's periodic reports
    pub fn reads_all_reports(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher | Role::GuidanceCounselor)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            "parent" => Role::Parent,
            "guidance_counselor" => Role::GuidanceCounselor,
            "staff" => Role::Staff,
            _ => Role::Guest,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Guest
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque view identifier shared by the sidebar, search and the host view
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        TabId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        TabId(s.to_string())
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tab identifiers
pub mod tabs {
    pub const HOME: &str = "home";
    pub const ABOUT: &str = "about";
    pub const CONTACT: &str = "contact";
    pub const INQUIRY: &str = "inquiry";
    pub const TEACHER_APPLICATION: &str = "teacher_application";
    pub const LOGIN: &str = "login";
    pub const DASHBOARD: &str = "dashboard";
    pub const USERS: &str = "users";
    pub const CHILDREN: &str = "children";
    pub const CLASSES: &str = "classes";
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const FEES: &str = "fees";
    pub const REPORTS: &str = "reports";
    pub const INQUIRIES: &str = "inquiries";
    pub const APPLICATIONS: &str = "applications";
    pub const ATTENDANCE: &str = "attendance";
    pub const COUNSELING: &str = "counseling";
    pub const SETTINGS: &str = "settings";
}

/// Remote table and bucket names
pub mod tables {
    pub const CHILDREN: &str = "children";
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const PROFILES: &str = "profiles";
    pub const INQUIRIES: &str = "inquiries";
    pub const TEACHER_APPLICATIONS: &str = "teacher_applications";
    pub const PERIODIC_REPORTS: &str = "periodic_reports";
    pub const APPLICATIONS_BUCKET: &str = "applications";
}

/// Child record (children table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Child {
    /// "First Last", or just the first name when the last name is blank
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name.trim(), last),
            _ => self.first_name.trim().to_string(),
        }
    }
}

/// Announcement record (announcements table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// User profile (profiles table), source of the caller's role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Profile {
    pub fn role(&self) -> Role {
        self.role.as_deref().map(Role::from).unwrap_or_default()
    }
}

/// One assessed development area inside a periodic report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportArea {
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Periodic development report (periodic_reports table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicReport {
    pub id: String,
    pub child_id: String,
    pub period: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub areas: Vec<ReportArea>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
