//! Book request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Book, NewBook, UpdateBook};

fn default_copies() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    #[schema(example = "The Pragmatic Programmer")]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be between 1 and 255 characters"))]
    #[schema(example = "Andrew Hunt")]
    pub author: String,
    #[validate(range(min = 1, message = "Year must be positive"))]
    #[schema(example = 1999)]
    pub year: Option<i32>,
    #[validate(length(min = 10, max = 13, message = "ISBN must be between 10 and 13 characters"))]
    #[schema(example = "9780201616224")]
    pub isbn: Option<String>,
    #[serde(default = "default_copies")]
    #[validate(range(min = 0, message = "Copies available must not be negative"))]
    #[schema(example = 1, minimum = 0)]
    pub copies_available: i32,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl From<CreateBookRequest> for NewBook {
    fn from(req: CreateBookRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            year: req.year,
            isbn: req.isbn,
            copies_available: req.copies_available,
            description: req.description,
        }
    }
}

/// Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be between 1 and 255 characters"))]
    pub author: Option<String>,
    #[validate(range(min = 1, message = "Year must be positive"))]
    pub year: Option<i32>,
    #[validate(length(min = 10, max = 13, message = "ISBN must be between 10 and 13 characters"))]
    pub isbn: Option<String>,
    #[validate(range(min = 0, message = "Copies available must not be negative"))]
    pub copies_available: Option<i32>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl From<UpdateBookRequest> for UpdateBook {
    fn from(req: UpdateBookRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            year: req.year,
            isbn: req.isbn,
            copies_available: req.copies_available,
            description: req.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    #[schema(example = 3)]
    pub copies_available: i32,
    pub description: Option<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            year: book.year,
            isbn: book.isbn,
            copies_available: book.copies_available,
            description: book.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_default_to_one() {
        let req: CreateBookRequest =
            serde_json::from_str(r#"{"title":"Dune","author":"Frank Herbert"}"#).unwrap();
        assert_eq!(req.copies_available, 1);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_book_fields() {
        let req: CreateBookRequest = serde_json::from_str(
            r#"{"title":"","author":"A","year":0,"isbn":"123","copies_available":-1}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        assert_eq!(fields, vec!["copies_available", "isbn", "title", "year"]);
    }

    #[test]
    fn test_empty_update_is_valid_and_empty() {
        let req: UpdateBookRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert!(UpdateBook::from(req).is_empty());
    }
}
