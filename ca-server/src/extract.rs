//! Request extractors that reject with the JSON error body
//!
//! axum's own extractors answer malformed input with plain text; these
//! wrappers route the rejection through [`AppError`] instead.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use shared::error::AppError;

/// JSON body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
