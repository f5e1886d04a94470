//! `/user` endpoints of the user service.

use crate::error::{ClientError, Result};
use crate::types::ApiErrorBody;
use reqwest::{Client, Response, StatusCode};
use roster_core::{User, UserDraft, UserId, UserPage};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Users client for the user service.
pub struct UsersClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
}

impl<'a> UsersClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch one page of the collection.
    ///
    /// The page is returned exactly as the server sent it.
    pub async fn list(&self, page: u32, limit: u32) -> Result<UserPage> {
        let url = self.endpoint(&["user"])?;
        debug!(url = %url, page, limit, "Fetching user page");

        let response = self
            .http
            .get(url)
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(error_from(response, None).await);
        }

        let page: UserPage = read_json(response, "user page").await?;
        debug!(
            page = page.page,
            users = page.data.len(),
            total = page.total,
            "Fetched user page"
        );

        Ok(page)
    }

    /// Get a single user by ID.
    pub async fn get(&self, id: &UserId) -> Result<User> {
        let url = self.endpoint(&["user", id.as_str()])?;
        debug!(url = %url, user_id = %id, "Fetching user");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(error_from(response, Some(id)).await);
        }

        read_json(response, "user").await
    }

    /// Create a user from a partial body.
    pub async fn create(&self, draft: &UserDraft) -> Result<User> {
        let url = self.endpoint(&["user", "create"])?;
        debug!(url = %url, "Creating user");

        let response = self
            .http
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(error_from(response, None).await);
        }

        let user: User = read_json(response, "created user").await?;
        debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Update the fields present in `draft`.
    pub async fn update(&self, id: &UserId, draft: &UserDraft) -> Result<User> {
        let url = self.endpoint(&["user", id.as_str()])?;
        debug!(url = %url, user_id = %id, "Updating user");

        let response = self
            .http
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(error_from(response, Some(id)).await);
        }

        read_json(response, "updated user").await
    }

    /// Delete a user.
    pub async fn delete(&self, id: &UserId) -> Result<()> {
        let url = self.endpoint(&["user", id.as_str()])?;
        debug!(url = %url, user_id = %id, "Deleting user");

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if response.status().is_success() {
            debug!(user_id = %id, "User deleted");
            Ok(())
        } else {
            Err(error_from(response, Some(id)).await)
        }
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {} response: {}", what, e)))
}

/// Turn a non-success response into an error. A 404 for a specific user
/// becomes `NotFound`; everything else keeps the status and the service's
/// error message.
async fn error_from(response: Response, id: Option<&UserId>) -> ClientError {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return ClientError::NotFound(id.to_string());
        }
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.message())
        .unwrap_or(text);

    ClientError::ServerError {
        status: status.as_u16(),
        message,
    }
}
