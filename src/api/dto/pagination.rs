//! Offset pagination query parameters.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// `?skip=0&limit=100`
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, Validate)]
pub struct PaginationParams {
    /// Number of records to skip
    #[serde(default)]
    #[validate(range(min = 0, message = "Skip must not be negative"))]
    #[param(minimum = 0, example = 0)]
    pub skip: i64,

    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 100)]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!((params.skip, params.limit), (0, 100));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_limit_bounds() {
        let params = PaginationParams { skip: 0, limit: 101 };
        assert!(params.validate().is_err());
        let params = PaginationParams { skip: -1, limit: 10 };
        assert!(params.validate().is_err());
    }
}
