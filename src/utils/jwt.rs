use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token sent as `Authorization: Bearer`
    Access,
    /// Long-lived token exchanged at `/auth/refresh`
    Refresh,
}

/// JWT claims; `sub` carries the user id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, email: String, token_type: TokenType, expiration_hours: i64) -> Self {
        let iat = jiff::Timestamp::now().as_second();
        Self {
            sub: user_id.to_string(),
            email,
            token_type,
            iat,
            exp: iat + expiration_hours * SECONDS_PER_HOUR,
        }
    }

    /// Parses `sub` back into a user id.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub.parse().map_err(|_| AppError::Unauthorized {
            message: "Invalid token subject".to_string(),
        })
    }
}

pub fn generate_token(
    user_id: i32,
    email: String,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user_id, email, token_type, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Generates `(access_token, refresh_token)` for a user.
pub fn generate_token_pair(
    user_id: i32,
    email: String,
    secret: &str,
    access_expiration_hours: i64,
    refresh_expiration_hours: i64,
) -> AppResult<(String, String)> {
    let access_token = generate_token(
        user_id,
        email.clone(),
        TokenType::Access,
        secret,
        access_expiration_hours,
    )?;
    let refresh_token = generate_token(
        user_id,
        email,
        TokenType::Refresh,
        secret,
        refresh_expiration_hours,
    )?;

    Ok((access_token, refresh_token))
}

/// Decodes a token and checks signature, expiry and, if given, its type.
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })?;

    if let Some(expected) = expected_type
        && claims.token_type != expected
    {
        return Err(AppError::Unauthorized {
            message: format!(
                "Invalid token type: expected {:?}, got {:?}",
                expected, claims.token_type
            ),
        });
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123";

    fn pair() -> (String, String) {
        generate_token_pair(7, "ann@example.com".to_string(), TEST_SECRET, 1, 168).unwrap()
    }

    #[test]
    fn test_token_pair_round_trips_claims() {
        let (access, refresh) = pair();
        assert_ne!(access, refresh);

        let claims = validate_access_token(&access, TEST_SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);

        let claims = validate_refresh_token(&refresh, TEST_SECRET).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        let (access, refresh) = pair();
        match validate_refresh_token(&access, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("Invalid token type")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
        assert!(validate_access_token(&refresh, TEST_SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (access, _) = pair();
        match validate_token(&access, "another_secret_key_for_jwt_testing", None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = generate_token(
            1,
            "ann@example.com".to_string(),
            TokenType::Access,
            TEST_SECRET,
            -1,
        )
        .unwrap();

        match validate_token(&token, TEST_SECRET, None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            validate_token("invalid.token.format", TEST_SECRET, None),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_token_type_serializes_lowercase() {
        let claims = Claims::new(1, "a@b.io".to_string(), TokenType::Refresh, 1);
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"token_type\":\"refresh\""));
    }
}
