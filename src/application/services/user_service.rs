use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    application::models::user::{UserCreate, UserFilter, UserUpdate, UsersList},
    application::services::page_limit,
    error::AppError,
    session::user::{UserPublic, UserRole},
    transport::http_client::ApiGateway,
    transport::request::ApiRequest,
};

/// User administration (admins) and the student directory (teachers and admins).
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_admin(&self, filter: &UserFilter) -> Result<UsersList, AppError>;

    async fn create_admin(&self, user: &UserCreate) -> Result<UserPublic, AppError>;

    async fn update_admin(&self, id: Uuid, patch: &UserUpdate) -> Result<UserPublic, AppError>;

    async fn list_students(&self, limit: u32, offset: u32) -> Result<UsersList, AppError>;
}

pub struct UserServiceImpl<T: ApiGateway> {
    client: Arc<T>,
}

impl<T: ApiGateway> UserServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: ApiGateway + 'static> UserService for UserServiceImpl<T> {
    async fn list_admin(&self, filter: &UserFilter) -> Result<UsersList, AppError> {
        let q = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let request = ApiRequest::get()
            .query("limit", page_limit(filter.limit.unwrap_or(50)))
            .query("offset", filter.offset.unwrap_or(0))
            .query_opt("q", q)
            .query_opt("role", filter.role)
            .query_opt("is_active", filter.is_active);

        let result: UsersList = self.client.send("/admin/users", request).await?;
        debug!("Loaded {} of {} users", result.items.len(), result.total);
        Ok(result)
    }

    async fn create_admin(&self, user: &UserCreate) -> Result<UserPublic, AppError> {
        info!("Creating {} account for {}", user.role, user.email);
        self.client
            .send("/admin/users", ApiRequest::post().json(user)?)
            .await
    }

    async fn update_admin(&self, id: Uuid, patch: &UserUpdate) -> Result<UserPublic, AppError> {
        info!("Updating user {}", id);
        self.client
            .send(&format!("/admin/users/{id}"), ApiRequest::patch().json(patch)?)
            .await
    }

    async fn list_students(&self, limit: u32, offset: u32) -> Result<UsersList, AppError> {
        let request = ApiRequest::get()
            .query("role", UserRole::Student)
            .query("limit", page_limit(limit))
            .query("offset", offset);
        self.client.send("/users", request).await
    }
}
