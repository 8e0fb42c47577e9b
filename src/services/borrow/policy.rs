//! Lending rules shared by every `LendingStore`
//!
//! Stores gather a snapshot under their own locking and ask these functions
//! for the verdict, so the evaluation order is identical everywhere.

use crate::models::BorrowRecord;
use crate::services::borrow::BorrowError;

/// Maximum number of unreturned borrows one reader may hold.
pub const MAX_ACTIVE_BORROWS: i64 = 3;

/// State read inside the atomic unit before a borrow is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowSnapshot {
    pub book_id: i32,
    pub reader_id: i32,
    /// `None` when the book does not exist
    pub copies_available: Option<i32>,
    pub reader_exists: bool,
    pub active_borrows: i64,
}

/// Checks run in order: book, reader, copies, limit. The first failure wins.
pub fn check_borrow(snapshot: &BorrowSnapshot) -> Result<(), BorrowError> {
    let copies = snapshot
        .copies_available
        .ok_or(BorrowError::BookNotFound(snapshot.book_id))?;
    if !snapshot.reader_exists {
        return Err(BorrowError::ReaderNotFound(snapshot.reader_id));
    }
    if copies < 1 {
        return Err(BorrowError::NoAvailableCopies);
    }
    if snapshot.active_borrows >= MAX_ACTIVE_BORROWS {
        return Err(BorrowError::BorrowLimitExceeded);
    }
    Ok(())
}

/// A record can be returned once.
pub fn check_return(borrow_id: i32, record: Option<&BorrowRecord>) -> Result<&BorrowRecord, BorrowError> {
    let record = record.ok_or(BorrowError::RecordNotFound(borrow_id))?;
    if !record.is_active() {
        return Err(BorrowError::AlreadyReturned);
    }
    Ok(record)
}
