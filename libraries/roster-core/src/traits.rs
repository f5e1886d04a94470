/// Core traits for Roster
use crate::error::Result;
use crate::types::{User, UserDraft, UserId, UserPage};
use async_trait::async_trait;

/// Remote user service
///
/// Mirrors the REST collaborator one method per endpoint. Implementations
/// return errors exactly as they occurred; no retry happens at this layer.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /user?page={page}&limit={limit}`
    async fn list_users(&self, page: u32, limit: u32) -> Result<UserPage>;

    /// `GET /user/{id}`
    async fn get_user(&self, id: &UserId) -> Result<User>;

    /// `POST /user/create`
    async fn create_user(&self, draft: &UserDraft) -> Result<User>;

    /// `PUT /user/{id}`
    async fn update_user(&self, id: &UserId, draft: &UserDraft) -> Result<User>;

    /// `DELETE /user/{id}`
    async fn delete_user(&self, id: &UserId) -> Result<()>;
}
