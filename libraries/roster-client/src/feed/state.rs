//! Feed state machine
//!
//! Pure bookkeeping, no I/O. A fetch is split in two: `begin_*` decides
//! whether a request may go out and hands back a [`FetchTicket`], then
//! `complete`/`fail` applies the result. Tickets from before the latest
//! reset carry an older generation and are dropped on arrival.
//!
//! ```text
//!            reset / begin_first
//!   ┌────────────────────────────────┐
//!   ▼                                │
//! Idle ──begin_next──► FetchingNext ─┤── complete, more ──► Idle
//!   │                                └── complete, last ──► Exhausted
//!   └──begin_first──► FetchingFirst ─── (same outcomes)
//!
//! any failure of the current generation ──► Idle
//! ```

use roster_core::{User, UserPage};
use tracing::{debug, info, warn};

/// Fetch status of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing in flight; more pages may exist
    Idle,
    /// Page 1 is being fetched after a mount or reset
    FetchingFirst,
    /// A later page is being fetched
    FetchingNext,
    /// The server reports no further pages. Terminal until reset.
    Exhausted,
}

impl FeedStatus {
    pub fn is_fetching(self) -> bool {
        matches!(self, Self::FetchingFirst | Self::FetchingNext)
    }
}

/// Permission to fetch one page, valid for one generation of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    page: u32,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 1-based page index to request
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// What applying a fetched page did to the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Users were appended
    Appended {
        page: u32,
        added: usize,
        has_more: bool,
    },
    /// The ticket predates the latest reset; the page was discarded
    Stale,
    /// The server's total dropped below what the feed already holds. The feed
    /// has been reset and must be refetched from page 1.
    Rebuild,
}

/// More pages remain after `page` iff `page.page + 1 < ceil(total / limit)`.
pub fn has_more(page: &UserPage) -> bool {
    page.has_more()
}

/// Pagination counters of the most recent page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageMark {
    page: u32,
    total: u64,
    limit: u32,
}

/// Client-side aggregate of every page fetched so far
#[derive(Debug, Clone)]
pub struct FeedState {
    users: Vec<User>,
    last: Option<PageMark>,
    pages_loaded: usize,
    status: FeedStatus,
    generation: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            last: None,
            pages_loaded: 0,
            status: FeedStatus::Idle,
            generation: 0,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of pages appended since the last reset
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// `total` as reported by the latest page
    pub fn total(&self) -> Option<u64> {
        self.last.map(|mark| mark.total)
    }

    /// Index of the latest page appended
    pub fn last_page(&self) -> Option<u32> {
        self.last.map(|mark| mark.page)
    }

    /// Whether the latest page reports more after it. Unknown (no page yet)
    /// counts as more.
    pub fn has_more(&self) -> bool {
        match self.last {
            Some(mark) => roster_core::types::has_more(mark.page, mark.total, mark.limit),
            None => true,
        }
    }

    /// Discard every page and start a new generation.
    ///
    /// Any ticket handed out before this call becomes stale.
    pub fn reset(&mut self) {
        self.users.clear();
        self.last = None;
        self.pages_loaded = 0;
        self.status = FeedStatus::Idle;
        self.generation += 1;
        debug!(generation = self.generation, "Feed reset");
    }

    /// Reset and claim the fetch of page 1. Always succeeds: a refresh
    /// supersedes whatever was in flight.
    pub fn begin_first(&mut self) -> FetchTicket {
        self.reset();
        self.status = FeedStatus::FetchingFirst;
        FetchTicket {
            generation: self.generation,
            page: 1,
        }
    }

    /// Claim the fetch of the next page.
    ///
    /// Returns `None` while another fetch is in flight or once the feed is
    /// exhausted. If no page has landed yet (e.g. the first fetch failed) the
    /// ticket is for page 1.
    pub fn begin_next(&mut self) -> Option<FetchTicket> {
        if self.status != FeedStatus::Idle {
            return None;
        }

        let Some(mark) = self.last else {
            self.status = FeedStatus::FetchingFirst;
            return Some(FetchTicket {
                generation: self.generation,
                page: 1,
            });
        };

        if !roster_core::types::has_more(mark.page, mark.total, mark.limit) {
            self.status = FeedStatus::Exhausted;
            return None;
        }

        self.status = FeedStatus::FetchingNext;
        Some(FetchTicket {
            generation: self.generation,
            page: mark.page + 1,
        })
    }

    /// Apply a successfully fetched page.
    pub fn complete(&mut self, ticket: FetchTicket, page: UserPage) -> PageOutcome {
        if ticket.generation != self.generation {
            warn!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                page = ticket.page,
                "Discarding page from superseded fetch"
            );
            return PageOutcome::Stale;
        }

        let held = self.users.len() + page.data.len();
        if !self.users.is_empty() && held as u64 > page.total {
            info!(
                held,
                total = page.total,
                "Server total shrank below feed length, rebuilding"
            );
            self.reset();
            return PageOutcome::Rebuild;
        }

        let page_index = page.page;
        let more = page.has_more();
        let added = self.append_page(page);

        self.status = if more {
            FeedStatus::Idle
        } else {
            info!(users = self.users.len(), "Feed exhausted");
            FeedStatus::Exhausted
        };

        PageOutcome::Appended {
            page: page_index,
            added,
            has_more: more,
        }
    }

    /// Record a failed fetch. The feed returns to `Idle` so a later trigger
    /// can retry; pages already held are kept. Returns `false` for a stale
    /// ticket, which leaves the state alone.
    pub fn fail(&mut self, ticket: FetchTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.status = FeedStatus::Idle;
        true
    }

    /// Concatenate `page`'s users in received order and remember its
    /// counters. No sort, no dedup: appending the same page twice duplicates
    /// its users.
    pub fn append_page(&mut self, page: UserPage) -> usize {
        let added = page.data.len();
        self.last = Some(PageMark {
            page: page.page,
            total: page.total,
            limit: page.limit,
        });
        self.users.extend(page.data);
        self.pages_loaded += 1;
        added
    }
}
