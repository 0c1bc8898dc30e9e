//! Data models
//!
//! Shared between the server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, timestamps are Unix milliseconds.
//!
//! JSON field names follow the public API (Portuguese), Rust field names
//! describe the concept.

pub mod banner;
pub mod finance;
pub mod member;
pub mod notice;
pub mod product;
pub mod project;

// Re-exports
pub use banner::*;
pub use finance::*;
pub use member::*;
pub use notice::*;
pub use product::*;
pub use project::*;
