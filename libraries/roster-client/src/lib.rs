//! Roster Client
//!
//! HTTP client library for a remote user-management service, plus the
//! paged feed that stitches its list endpoint into one growing sequence.
//!
//! # Features
//!
//! - **Users**: list (paged), get, create, update, delete
//! - **Feed**: infinite-scroll aggregation with at most one page fetch in
//!   flight, and generation tags so a refresh supersedes stale fetches
//!
//! # Example
//!
//! ```ignore
//! use roster_client::{ClientConfig, PagedUserFeed, RosterClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("https://dummyapi.io/data/v1", "app-key");
//!     let client = RosterClient::new(config)?;
//!
//!     let feed = PagedUserFeed::new(client, 6);
//!     feed.refresh().await?;
//!     while feed.load_next().await?.is_loaded() {}
//!
//!     for user in feed.users().await {
//!         println!("{} {}", user.id, user.full_name());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod feed;
mod types;
mod users;

// Re-export main types
pub use client::RosterClient;
pub use error::{ClientError, Result};
pub use feed::{has_more, FeedState, FeedStatus, FetchOutcome, FetchTicket, PageOutcome, PagedUserFeed, SkipReason};
pub use types::{ClientConfig, APP_ID_HEADER};
pub use users::UsersClient;
