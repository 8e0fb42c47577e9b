//! User accounts and token issuance.

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::repositories::UserRepository;
use crate::utils::jwt::{generate_token_pair, validate_refresh_token};
use crate::utils::password::{hash_password, verify_password};

const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Access and refresh token issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Registers a user; `password` is plain text and hashed here.
    ///
    /// # Errors
    /// `Duplicate` when the email is taken.
    pub async fn create_user(&self, email: String, password: &str) -> AppResult<User> {
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Duplicate {
                entity: "user".to_string(),
                field: "email".to_string(),
                value: email,
            });
        }

        let user = self
            .repo
            .create(NewUser {
                email,
                password: hash_password(password)?,
            })
            .await?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_by_id("user", id))
    }

    /// Checks credentials. Unknown email and wrong password give the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: BAD_CREDENTIALS.to_string(),
            })?;

        if !verify_password(password, &user.password)? {
            tracing::warn!(user_id = user.id, "Login with wrong password");
            return Err(AppError::Unauthorized {
                message: BAD_CREDENTIALS.to_string(),
            });
        }
        Ok(user)
    }

    pub fn issue_tokens(&self, user: &User, jwt: &JwtConfig) -> AppResult<TokenPair> {
        let (access_token, refresh_token) = generate_token_pair(
            user.id,
            user.email.clone(),
            &jwt.secret,
            jwt.access_token_expiration,
            jwt.refresh_token_expiration,
        )?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a refresh token for a new pair if its user still exists.
    pub async fn refresh(&self, refresh_token: &str, jwt: &JwtConfig) -> AppResult<TokenPair> {
        let claims = validate_refresh_token(refresh_token, &jwt.secret)?;
        let user = self
            .repo
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "User no longer exists".to_string(),
            })?;
        self.issue_tokens(&user, jwt)
    }
}
