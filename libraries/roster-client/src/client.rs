//! Main Roster client.

use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, APP_ID_HEADER};
use crate::users::UsersClient;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use roster_core::{User, UserApi, UserDraft, UserId, UserPage};
use tracing::debug;
use url::Url;

/// Client for the remote user service.
///
/// Holds one pooled HTTP client with the `app-id` header preset, and hands
/// out borrowed [`UsersClient`]s for the individual endpoints. It also
/// implements [`UserApi`] so a [`PagedUserFeed`](crate::PagedUserFeed) can
/// drive it directly.
///
/// # Example
///
/// ```ignore
/// use roster_client::{ClientConfig, RosterClient};
///
/// let client = RosterClient::new(ClientConfig::new("https://dummyapi.io/data/v1", "app-key"))?;
/// let page = client.users().list(1, 6).await?;
/// println!("{} of {} users", page.data.len(), page.total);
/// ```
#[derive(Debug, Clone)]
pub struct RosterClient {
    http: Client,
    base_url: Url,
    url: String,
}

impl RosterClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        let base_url =
            Url::parse(&url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{} cannot be a base URL", url)));
        }

        if config.app_id.trim().is_empty() {
            return Err(ClientError::InvalidConfig("app id cannot be empty".into()));
        }
        let mut app_id = HeaderValue::from_str(&config.app_id)
            .map_err(|e| ClientError::InvalidConfig(format!("app id is not a valid header: {}", e)))?;
        app_id.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(APP_ID_HEADER, app_id);

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Roster/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        debug!(url = %url, "Created user service client");

        Ok(Self {
            http,
            base_url,
            url,
        })
    }

    /// Get the normalized base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Client for the `/user` endpoints.
    pub fn users(&self) -> UsersClient<'_> {
        UsersClient::new(&self.http, &self.base_url)
    }
}

#[async_trait]
impl UserApi for RosterClient {
    async fn list_users(&self, page: u32, limit: u32) -> roster_core::Result<UserPage> {
        Ok(self.users().list(page, limit).await?)
    }

    async fn get_user(&self, id: &UserId) -> roster_core::Result<User> {
        Ok(self.users().get(id).await?)
    }

    async fn create_user(&self, draft: &UserDraft) -> roster_core::Result<User> {
        Ok(self.users().create(draft).await?)
    }

    async fn update_user(&self, id: &UserId, draft: &UserDraft) -> roster_core::Result<User> {
        Ok(self.users().update(id, draft).await?)
    }

    async fn delete_user(&self, id: &UserId) -> roster_core::Result<()> {
        Ok(self.users().delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> ClientConfig {
        ClientConfig::new(url, "test-app-id")
    }

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(RosterClient::new(config("https://example.com")).is_ok());
        assert!(RosterClient::new(config("http://localhost:8080/data/v1")).is_ok());

        // Invalid URLs
        assert!(RosterClient::new(config("")).is_err());
        assert!(RosterClient::new(config("not-a-url")).is_err());
        assert!(RosterClient::new(config("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client = RosterClient::new(config("https://example.com/data/v1/")).expect("valid url");

        // URL should have trailing slash removed
        assert_eq!(client.url(), "https://example.com/data/v1");
    }

    #[test]
    fn test_app_id_required() {
        let result = RosterClient::new(ClientConfig::new("https://example.com", "  "));
        match result {
            Err(ClientError::InvalidConfig(msg)) => assert!(msg.contains("app id")),
            other => panic!("Expected InvalidConfig error, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_app_id_must_be_header_safe() {
        let result = RosterClient::new(ClientConfig::new("https://example.com", "bad\nkey"));
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }
}
