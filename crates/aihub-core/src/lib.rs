//! Core library for SoftArt AI HUB.
//!
//! - [`atoms`] — records, constants and the [`HubError`] enum
//! - [`store`] — SQLite catalog store ([`HubStore`])
//! - [`access`] — role-based tool visibility and permissions
//! - [`catalog`] — search, filters and pagination over visible tools

pub mod access;
pub mod atoms;
pub mod catalog;
pub mod store;

pub use access::{ToolPermissions, Viewer};
pub use atoms::error::{HubError, HubResult};
pub use catalog::{ApprovalFilter, ToolQuery};
pub use store::HubStore;
