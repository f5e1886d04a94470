//! Roster CLI
//!
//! Terminal front end for the user service: paged listing, detail view,
//! create/edit through the validated user form, and delete.

pub mod commands;
pub mod config;
pub mod error;
