mod ids;
mod page;
mod user;

pub use ids::UserId;
pub use page::{has_more, total_pages, UserPage, DEFAULT_PAGE_SIZE};
pub use user::{Location, User, UserDraft};
