//! ca-server: HTTP backend of the student association (CA) portal
//!
//! Serves the public site content (banners, board members, campaign
//! projects, announcements, the shop catalog) and the finance module of the
//! two cash funds, backed by PostgreSQL.
//!
//! - [`ordering`]: scoped, atomically reorderable collections
//! - [`finance`]: ledger arithmetic and the goal allocator
//! - [`db`]: sqlx repositories
//! - [`api`]: axum routes

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod finance;
pub mod logger;
pub mod media;
pub mod ordering;
pub mod state;
pub mod validation;

pub use config::Config;
pub use state::AppState;
