//! Unified error codes for the CA portal
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Content errors (banners, members, projects, notices, images)
//! - 4xxx: Ordering errors
//! - 5xxx: Finance errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can
/// branch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 3xxx: Content ====================
    /// Banner not found
    BannerNotFound = 3001,
    /// Team member not found
    MemberNotFound = 3002,
    /// Campaign project not found
    ProjectNotFound = 3003,
    /// Notice not found
    NoticeNotFound = 3004,
    /// Image payload could not be decoded
    InvalidImage = 3005,
    /// Image payload exceeds the size limit
    ImageTooLarge = 3006,

    // ==================== 4xxx: Ordering ====================
    /// Ordering list is empty
    OrderingEmpty = 4001,
    /// Ordering list contains the same id twice
    OrderingDuplicateId = 4002,
    /// Ordering list references an id outside the scope
    OrderingUnknownId = 4003,
    /// Ordering list does not cover every item of the scope
    OrderingIncomplete = 4004,
    /// Ordering list spans more than one scope
    OrderingMixedScope = 4005,
    /// Concurrent write aborted the transaction
    TransactionConflict = 4006,

    // ==================== 5xxx: Finance ====================
    /// Ledger transaction not found
    LedgerEntryNotFound = 5001,
    /// Funding goal not found
    GoalNotFound = 5002,
    /// Purchase item not found
    PurchaseItemNotFound = 5003,
    /// Amount must be positive
    InvalidAmount = 5004,
    /// Unknown fund
    InvalidFund = 5005,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product image not found
    ProductImageNotFound = 6002,
    /// Product price is invalid
    ProductInvalidPrice = 6003,
    /// Product custom field is invalid
    CustomFieldInvalid = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",

            // Content
            ErrorCode::BannerNotFound => "Banner not found",
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::ProjectNotFound => "Project not found",
            ErrorCode::NoticeNotFound => "Notice not found",
            ErrorCode::InvalidImage => "Invalid image format",
            ErrorCode::ImageTooLarge => "Image is too large",

            // Ordering
            ErrorCode::OrderingEmpty => "Ordering list must not be empty",
            ErrorCode::OrderingDuplicateId => "Ordering list contains duplicate ids",
            ErrorCode::OrderingUnknownId => "Ordering list contains unknown ids",
            ErrorCode::OrderingIncomplete => "Ordering list must include every item",
            ErrorCode::OrderingMixedScope => "Ordering list spans more than one group",
            ErrorCode::TransactionConflict => "Concurrent update, please retry",

            // Finance
            ErrorCode::LedgerEntryNotFound => "Transaction not found",
            ErrorCode::GoalNotFound => "Goal not found",
            ErrorCode::PurchaseItemNotFound => "Purchase item not found",
            ErrorCode::InvalidAmount => "Amount must be greater than zero",
            ErrorCode::InvalidFund => "Unknown fund",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductImageNotFound => "Product image not found",
            ErrorCode::ProductInvalidPrice => "Product price is invalid",
            ErrorCode::CustomFieldInvalid => "Custom field is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Content
            3001 => Ok(ErrorCode::BannerNotFound),
            3002 => Ok(ErrorCode::MemberNotFound),
            3003 => Ok(ErrorCode::ProjectNotFound),
            3004 => Ok(ErrorCode::NoticeNotFound),
            3005 => Ok(ErrorCode::InvalidImage),
            3006 => Ok(ErrorCode::ImageTooLarge),

            // Ordering
            4001 => Ok(ErrorCode::OrderingEmpty),
            4002 => Ok(ErrorCode::OrderingDuplicateId),
            4003 => Ok(ErrorCode::OrderingUnknownId),
            4004 => Ok(ErrorCode::OrderingIncomplete),
            4005 => Ok(ErrorCode::OrderingMixedScope),
            4006 => Ok(ErrorCode::TransactionConflict),

            // Finance
            5001 => Ok(ErrorCode::LedgerEntryNotFound),
            5002 => Ok(ErrorCode::GoalNotFound),
            5003 => Ok(ErrorCode::PurchaseItemNotFound),
            5004 => Ok(ErrorCode::InvalidAmount),
            5005 => Ok(ErrorCode::InvalidFund),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductImageNotFound),
            6003 => Ok(ErrorCode::ProductInvalidPrice),
            6004 => Ok(ErrorCode::CustomFieldInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::BannerNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderingUnknownId.code(), 4003);
        assert_eq!(ErrorCode::TransactionConflict.code(), 4006);
        assert_eq!(ErrorCode::GoalNotFound.code(), 5002);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TokenExpired,
            ErrorCode::ImageTooLarge,
            ErrorCode::OrderingMixedScope,
            ErrorCode::InvalidFund,
            ErrorCode::CustomFieldInvalid,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
        assert_eq!(ErrorCode::try_from(1002), Err(InvalidErrorCode(1002)));
        assert_eq!(ErrorCode::try_from(4), Err(InvalidErrorCode(4)));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(ErrorCode::OrderingEmpty.to_string(), "E4001");
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");

        let json = serde_json::to_string(&ErrorCode::GoalNotFound).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("4004").unwrap();
        assert_eq!(code, ErrorCode::OrderingIncomplete);
        assert!(serde_json::from_str::<ErrorCode>("4999").is_err());
    }
}
