//! Roster Core
//!
//! Platform-agnostic domain types, the remote API contract, and form
//! validation shared by every Roster crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `UserPage`, `UserDraft`, `UserId`
//! - **Core Traits**: `UserApi`, the contract a user service client fulfils
//! - **Forms**: `UserForm` and its validation rules
//! - **Error Handling**: Unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use roster_core::types::UserPage;
//!
//! let page: UserPage = serde_json::from_str(
//!     r#"{"data": [], "total": 13, "page": 1, "limit": 6}"#,
//! ).unwrap();
//!
//! assert_eq!(page.total_pages(), 3);
//! assert!(page.has_more());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod form;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use form::{FieldErrors, FormField, FormMode, UserForm, UserFormValues};
pub use traits::UserApi;

pub use types::{Location, User, UserDraft, UserId, UserPage, DEFAULT_PAGE_SIZE};
