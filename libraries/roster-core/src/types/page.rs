/// One page of the user collection
use serde::{Deserialize, Serialize};

use super::User;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// A single response from the collection endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    /// Users on this page, in server order
    pub data: Vec<User>,
    /// Count of all users across all pages
    pub total: u64,
    /// 1-based index of this page
    pub page: u32,
    /// Page size that was requested
    pub limit: u32,
}

impl UserPage {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `ceil(total / limit)` as reported by this page
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.limit)
    }

    /// Whether the server reports another page after this one
    pub fn has_more(&self) -> bool {
        has_more(self.page, self.total, self.limit)
    }
}

/// `ceil(total / limit)`; zero when `limit` is zero.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// More pages remain iff `page + 1 < ceil(total / limit)`.
///
/// Must be evaluated against the latest page received, since `total` moves
/// between requests when users are created or deleted.
pub fn has_more(page: u32, total: u64, limit: u32) -> bool {
    u64::from(page) + 1 < total_pages(total, limit)
}
