//! Data Transfer Objects for API requests and responses.

mod auth;
mod book;
mod borrow;
mod error;
mod health;
mod pagination;
mod reader;

pub use auth::{CredentialsRequest, LoginRequest, RefreshTokenRequest, TokenResponse};
pub use book::{BookResponse, CreateBookRequest, UpdateBookRequest};
pub use borrow::{BorrowRecordResponse, BorrowRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus, WelcomeResponse};
pub use pagination::PaginationParams;
pub use reader::{CreateReaderRequest, ReaderResponse, UpdateReaderRequest};
