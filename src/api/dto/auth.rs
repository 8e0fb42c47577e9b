//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::TokenPair;

/// Registration body; the password rules apply to new accounts only.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "librarian@example.com", format = "email")]
    pub email: String,
    /// Plain text password
    #[validate(length(min = 6, max = 30, message = "Password must be between 6 and 30 characters"))]
    #[schema(example = "password123", format = "password", min_length = 6, max_length = 30)]
    pub password: String,
}

/// Login only checks shape, so a wrong password of any length answers 401.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "librarian@example.com", format = "email")]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    #[schema(example = "password123", format = "password")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Access token (short-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    /// Refresh token (long-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
    /// Always "bearer"
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let ok = CredentialsRequest {
            email: "ann@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = CredentialsRequest {
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
        };
        let errors = short.validate().unwrap_err();
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn test_login_accepts_any_non_empty_password() {
        let short = LoginRequest {
            email: "ann@example.com".to_string(),
            password: "abc".to_string(),
        };
        assert!(short.validate().is_ok());

        let long = LoginRequest {
            email: "ann@example.com".to_string(),
            password: "x".repeat(64),
        };
        assert!(long.validate().is_ok());

        let empty = LoginRequest {
            email: "ann@example.com".to_string(),
            password: String::new(),
        };
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
