//! Reader request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewReader, Reader, UpdateReader};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateReaderRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com", format = "email")]
    pub email: String,
}

impl From<CreateReaderRequest> for NewReader {
    fn from(req: CreateReaderRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateReaderRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl From<UpdateReaderRequest> for UpdateReader {
    fn from(req: UpdateReaderRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReaderResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<Reader> for ReaderResponse {
    fn from(reader: Reader) -> Self {
        Self {
            id: reader.id,
            name: reader.name,
            email: reader.email,
        }
    }
}
