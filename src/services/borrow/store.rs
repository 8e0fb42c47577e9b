use async_trait::async_trait;

use crate::models::BorrowRecord;
use crate::services::borrow::BorrowError;

/// Authoritative owner of the borrow/return atomic units.
///
/// Implementations evaluate `policy` against state read under the same lock
/// or transaction that applies the mutation, so concurrent callers can never
/// both pass a check that only one of them may pass.
#[async_trait]
pub trait LendingStore: Send + Sync {
    /// Decrements the book's copies and inserts an active record, atomically.
    async fn borrow(
        &self,
        book_id: i32,
        reader_id: i32,
        at: jiff::Timestamp,
    ) -> Result<BorrowRecord, BorrowError>;

    /// Sets `return_date` and increments the book's copies, atomically.
    async fn return_borrow(
        &self,
        borrow_id: i32,
        at: jiff::Timestamp,
    ) -> Result<BorrowRecord, BorrowError>;

    /// Active records of a reader, ordered by id.
    async fn active_borrows(&self, reader_id: i32) -> Result<Vec<BorrowRecord>, BorrowError>;

    async fn get(&self, borrow_id: i32) -> Result<BorrowRecord, BorrowError>;
}
