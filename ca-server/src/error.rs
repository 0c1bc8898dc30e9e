//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so repositories and handlers can use `?`
//! without mapping every call by hand.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQLSTATE codes raised when a transaction loses a race and may be retried
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Service-layer error, two variants only.
///
/// - `Db`: Database/infrastructure errors (auto-logged, mapped to InternalError)
/// - `App`: Business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl ServiceError {
    /// True when the store aborted the transaction and a retry may succeed
    pub fn is_conflict(&self) -> bool {
        matches!(self, ServiceError::App(e) if e.code == ErrorCode::TransactionConflict)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = e
            && matches!(
                db.code().as_deref(),
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
            )
        {
            tracing::warn!(error = %e, "Transaction aborted by concurrent write");
            return ServiceError::App(AppError::conflict(
                "Concurrent update detected, please retry",
            ));
        }
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_become_generic_internal() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_conflict());
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InternalError);
        // cause is logged, never sent to the client
        assert_eq!(app.message, ErrorCode::InternalError.message());
    }

    #[test]
    fn app_errors_pass_through() {
        let err = ServiceError::from(AppError::new(ErrorCode::BannerNotFound));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::BannerNotFound);
    }

    #[test]
    fn conflict_is_detected() {
        let err = ServiceError::from(AppError::conflict("retry"));
        assert!(err.is_conflict());
    }
}
