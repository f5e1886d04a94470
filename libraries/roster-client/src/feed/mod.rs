//! Paged user feed
//!
//! Turns the paged list endpoint into one growing sequence of users, the way
//! an infinite-scroll list consumes it: load page 1, then load the next page
//! whenever the consumer nears the end, until the server says there is no
//! more.

mod state;

pub use state::{has_more, FeedState, FeedStatus, FetchTicket, PageOutcome};

use roster_core::{Result, RosterError, User, UserApi, UserId, UserPage};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Why a trigger did not start a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch is already in flight
    InFlight,
    /// The server reported the last page
    Exhausted,
}

/// Result of a load/refresh call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was fetched and appended
    Loaded {
        page: u32,
        added: usize,
        exhausted: bool,
    },
    /// No request was issued
    Skipped(SkipReason),
    /// The fetch finished after a reset and its page was dropped
    Stale,
}

impl FetchOutcome {
    /// Whether a page was appended. A `load_next` loop stops on anything else.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// A feed of users assembled from successive pages of `api`.
///
/// Safe to share between tasks (e.g. behind an `Arc`): the state lives
/// behind a mutex that is never held across a request, so a trigger arriving
/// while a page is loading sees the in-flight status and backs off.
pub struct PagedUserFeed<A> {
    api: A,
    page_size: u32,
    state: Mutex<FeedState>,
}

impl<A: UserApi> PagedUserFeed<A> {
    /// Create an empty feed. Nothing is fetched until [`refresh`](Self::refresh)
    /// or [`load_next`](Self::load_next) is called.
    pub fn new(api: A, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            state: Mutex::new(FeedState::new()),
        }
    }

    /// The underlying service, for calls that bypass the feed
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch one page without touching the feed.
    ///
    /// Failures come back exactly as the service produced them; there is no
    /// retry.
    pub async fn fetch_page(&self, page: u32, limit: u32) -> Result<UserPage> {
        if page == 0 {
            return Err(RosterError::invalid_input("page index starts at 1"));
        }
        if limit == 0 {
            return Err(RosterError::invalid_input("page size must be at least 1"));
        }
        self.api.list_users(page, limit).await
    }

    /// Clear the feed and start a new generation. Fetches still in flight
    /// will be discarded when they land.
    pub async fn reset(&self) {
        self.state.lock().await.reset();
    }

    /// Reset and load page 1. Used for the initial load and for
    /// pull-to-refresh; supersedes any fetch in flight.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let ticket = self.state.lock().await.begin_first();
        info!(generation = ticket.generation(), "Refreshing user feed");
        self.run(ticket).await
    }

    /// Load the next page if one exists and nothing is in flight.
    ///
    /// Call whenever the consumer gets close to the end of the list. Extra
    /// calls are cheap no-ops returning [`FetchOutcome::Skipped`].
    pub async fn load_next(&self) -> Result<FetchOutcome> {
        let ticket = {
            let mut state = self.state.lock().await;
            match state.begin_next() {
                Some(ticket) => ticket,
                None => {
                    let reason = if state.status() == FeedStatus::Exhausted {
                        SkipReason::Exhausted
                    } else {
                        SkipReason::InFlight
                    };
                    debug!(?reason, "Next page trigger ignored");
                    return Ok(FetchOutcome::Skipped(reason));
                }
            }
        };
        self.run(ticket).await
    }

    /// Delete a user, then rebuild the feed from page 1.
    ///
    /// The deleted row is not spliced out: page boundaries and `total` can
    /// only be recomputed by the server. If the delete fails the feed is
    /// untouched and the service error is returned. If only the reload fails
    /// the error is [`RosterError::DeletedReloadFailed`], carrying the cause.
    pub async fn delete_user(&self, id: &UserId) -> Result<FetchOutcome> {
        self.api.delete_user(id).await?;
        info!(user_id = %id, "User deleted, rebuilding feed");

        self.refresh().await.map_err(|err| {
            warn!(user_id = %id, error = %err, "User deleted but feed reload failed");
            RosterError::DeletedReloadFailed {
                id: id.to_string(),
                source: Box::new(err),
            }
        })
    }

    /// Snapshot of the users loaded so far, in page order
    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }

    pub async fn status(&self) -> FeedStatus {
        self.state.lock().await.status()
    }

    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation()
    }

    /// `total` from the most recent page
    pub async fn total(&self) -> Option<u64> {
        self.state.lock().await.total()
    }

    pub async fn has_more(&self) -> bool {
        self.state.lock().await.has_more()
    }

    /// Perform the fetch a ticket grants and apply the result. A `Rebuild`
    /// outcome restarts from page 1 under a fresh ticket.
    async fn run(&self, ticket: FetchTicket) -> Result<FetchOutcome> {
        let mut ticket = ticket;
        loop {
            let fetched = self.fetch_page(ticket.page(), self.page_size).await;

            let mut state = self.state.lock().await;
            match fetched {
                Ok(page) => match state.complete(ticket, page) {
                    PageOutcome::Appended {
                        page,
                        added,
                        has_more,
                    } => {
                        debug!(page, added, len = state.len(), "Page appended");
                        return Ok(FetchOutcome::Loaded {
                            page,
                            added,
                            exhausted: !has_more,
                        });
                    }
                    PageOutcome::Stale => return Ok(FetchOutcome::Stale),
                    PageOutcome::Rebuild => {
                        ticket = state.begin_first();
                    }
                },
                Err(err) => {
                    if state.fail(ticket) {
                        warn!(page = ticket.page(), error = %err, "Page fetch failed");
                        return Err(err);
                    }
                    debug!(page = ticket.page(), error = %err, "Superseded fetch failed");
                    return Ok(FetchOutcome::Stale);
                }
            }
        }
    }
}
