//! Bearer token authentication for write routes

pub mod jwt;

pub use jwt::{Claims, Principal, create_token, require_auth};
