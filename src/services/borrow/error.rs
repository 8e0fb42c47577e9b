use thiserror::Error;

use crate::error::AppError;

/// Outcome of a refused or failed lending operation.
///
/// Rule variants leave the store untouched; `Store` means the atomic unit was
/// rolled back and the caller may re-read the record before trying again.
#[derive(Debug, Error)]
pub enum BorrowError {
    #[error("Book {0} not found")]
    BookNotFound(i32),

    #[error("Reader {0} not found")]
    ReaderNotFound(i32),

    #[error("Borrow record {0} not found")]
    RecordNotFound(i32),

    #[error("No available copies of this book")]
    NoAvailableCopies,

    #[error("Reader has reached the maximum limit of borrowed books")]
    BorrowLimitExceeded,

    #[error("This book has already been returned")]
    AlreadyReturned,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl BorrowError {
    /// Stable machine code for lending-rule rejections.
    pub fn rule_code(&self) -> Option<&'static str> {
        match self {
            BorrowError::NoAvailableCopies => Some("NO_AVAILABLE_COPIES"),
            BorrowError::BorrowLimitExceeded => Some("BORROW_LIMIT_EXCEEDED"),
            BorrowError::AlreadyReturned => Some("ALREADY_RETURNED"),
            _ => None,
        }
    }

    pub fn is_store_failure(&self) -> bool {
        matches!(self, BorrowError::Store(_))
    }
}

impl From<diesel::result::Error> for BorrowError {
    fn from(error: diesel::result::Error) -> Self {
        BorrowError::Store(AppError::from(error))
    }
}

impl From<BorrowError> for AppError {
    fn from(error: BorrowError) -> Self {
        if let Some(rule) = error.rule_code() {
            return AppError::Rejected {
                rule: rule.to_string(),
                message: error.to_string(),
            };
        }
        match error {
            BorrowError::BookNotFound(id) => AppError::not_found_by_id("book", id),
            BorrowError::ReaderNotFound(id) => AppError::not_found_by_id("reader", id),
            BorrowError::RecordNotFound(id) => AppError::not_found_by_id("borrow_record", id),
            BorrowError::Store(inner) => inner,
            rule => AppError::Internal {
                source: anyhow::anyhow!("unmapped lending rule: {}", rule),
            },
        }
    }
}
