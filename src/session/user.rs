use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Teacher => write!(f, "teacher"),
            UserRole::Student => write!(f, "student"),
        }
    }
}

/// Public profile returned by `/auth/me`, `/auth/register` and the user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserPublic {
    /// Navigation sections this user may open, in menu order.
    pub fn sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| section.visible_to(self.role))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Role-gated areas of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Dashboard,
    Records,
    Import,
    Users,
    Engine,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Records,
        Section::Import,
        Section::Users,
        Section::Engine,
    ];

    pub fn visible_to(&self, role: UserRole) -> bool {
        match self {
            Section::Dashboard | Section::Records => true,
            Section::Import => matches!(role, UserRole::Teacher | UserRole::Admin),
            Section::Users | Section::Engine => role == UserRole::Admin,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Section::Dashboard => "/dashboard",
            Section::Records => "/records",
            Section::Import => "/import",
            Section::Users => "/admin/users",
            Section::Engine => "/admin/ml",
        }
    }
}
