//! Borrow workflow DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::BorrowRecord;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BorrowRequest {
    #[validate(range(min = 1, message = "Book id must be positive"))]
    #[schema(example = 1, minimum = 1)]
    pub book_id: i32,
    #[validate(range(min = 1, message = "Reader id must be positive"))]
    #[schema(example = 1, minimum = 1)]
    pub reader_id: i32,
}

/// Timestamps are RFC 3339; `return_date` is null while the borrow is active.
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowRecordResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub book_id: i32,
    pub reader_id: i32,
    #[schema(value_type = String, format = DateTime, example = "2025-01-01T12:00:00Z")]
    pub borrow_date: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub return_date: Option<String>,
}

impl From<BorrowRecord> for BorrowRecordResponse {
    fn from(record: BorrowRecord) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            reader_id: record.reader_id,
            borrow_date: record.borrow_date.to_jiff().to_string(),
            return_date: record.return_date.map(|at| at.to_jiff().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff_diesel::ToDiesel;
    use validator::Validate;

    #[test]
    fn test_borrow_request_ids_must_be_positive() {
        let ok = BorrowRequest {
            book_id: 1,
            reader_id: 7,
        };
        assert!(ok.validate().is_ok());

        let bad = BorrowRequest {
            book_id: 0,
            reader_id: -3,
        };
        let errors = bad.validate().unwrap_err();
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        assert_eq!(fields, vec!["book_id", "reader_id"]);
    }

    #[test]
    fn test_active_record_serializes_null_return_date() {
        let at: jiff::Timestamp = "2025-03-01T10:00:00Z".parse().unwrap();
        let response = BorrowRecordResponse::from(BorrowRecord {
            id: 1,
            book_id: 2,
            reader_id: 3,
            borrow_date: at.to_diesel(),
            return_date: None,
        });

        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["borrow_date"], "2025-03-01T10:00:00Z");
        assert!(json["return_date"].is_null());
    }
}
