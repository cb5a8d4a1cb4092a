use crate::session::user::{UserPublic, UserRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsersList {
    pub items: Vec<UserPublic>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserFilter {
    /// Free-text match on email or name.
    pub q: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
