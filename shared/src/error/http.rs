//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::BannerNotFound
            | Self::MemberNotFound
            | Self::ProjectNotFound
            | Self::NoticeNotFound
            | Self::LedgerEntryNotFound
            | Self::GoalNotFound
            | Self::PurchaseItemNotFound
            | Self::ProductNotFound
            | Self::ProductImageNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::TransactionConflict => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 413 Payload Too Large
            Self::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_statuses() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::BannerNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::GoalNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ProductImageNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_ordering_errors_are_bad_requests() {
        // unknown ids are a validation failure, not a 404
        assert_eq!(
            ErrorCode::OrderingUnknownId.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::OrderingEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::OrderingIncomplete.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::TransactionConflict.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_and_system_statuses() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::ImageTooLarge.http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ErrorCode::InvalidAmount.http_status(), StatusCode::BAD_REQUEST);
    }
}
