//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 3xxx: Content errors
/// - 4xxx: Ordering errors
/// - 5xxx: Finance errors
/// - 6xxx: Catalog errors
/// - 9xxx (and unassigned ranges such as 2xxx): System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Content errors (3xxx)
    Content,
    /// Ordering errors (4xxx)
    Ordering,
    /// Finance errors (5xxx)
    Finance,
    /// Catalog errors (6xxx)
    Catalog,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            3000..4000 => Self::Content,
            4000..5000 => Self::Ordering,
            5000..6000 => Self::Finance,
            6000..7000 => Self::Catalog,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Content => "content",
            Self::Ordering => "ordering",
            Self::Finance => "finance",
            Self::Catalog => "catalog",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Content);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Ordering);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Finance);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenInvalid.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::MemberNotFound.category(), ErrorCategory::Content);
        assert_eq!(
            ErrorCode::OrderingDuplicateId.category(),
            ErrorCategory::Ordering
        );
        assert_eq!(ErrorCode::GoalNotFound.category(), ErrorCategory::Finance);
        assert_eq!(
            ErrorCode::ProductImageNotFound.category(),
            ErrorCategory::Catalog
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ErrorCategory::Ordering).unwrap();
        assert_eq!(json, "\"ordering\"");

        let category: ErrorCategory = serde_json::from_str("\"finance\"").unwrap();
        assert_eq!(category, ErrorCategory::Finance);
    }
}
