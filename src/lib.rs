//! SoftArt AI HUB server.
//!
//! An internal catalog of AI tools. Users see the tools published for their
//! role; anyone can submit a tool for review; the Owner approves, edits and
//! deletes tools and maintains the taxonomy and user list.
//!
//! # Layout
//! - [`config`] — TOML + environment configuration
//! - [`state`] — shared handler state, Owner bootstrap
//! - [`api`] — axum handlers and routes under `/api`
//! - [`server`] — router assembly, CORS, request log, graceful shutdown
//!
//! Records, the SQLite store and the visibility rules live in `aihub-core`.
//!
//! # Identity
//! Sign-in is handled by the SSO proxy in front of the hub. It forwards the
//! user's email in `x-user-email` (configurable); the hub maps it to a user
//! row and that user's role.
//!
//! # Running
//! ```sh
//! RUST_LOG=info aihub --config /etc/aihub/config.toml
//! ```

pub mod api;
pub mod config;
pub mod server;
pub mod state;

pub use config::HubConfig;
pub use server::build_router;
pub use state::AppState;
