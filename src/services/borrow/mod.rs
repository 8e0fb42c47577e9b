//! Borrow/return workflow.
//!
//! `BorrowService` is the entry point used by the API. It delegates each
//! atomic unit to a `LendingStore` and runs it on its own tokio task, so a
//! dropped request future cannot interrupt a unit halfway.

mod error;
mod memory;
pub mod policy;
mod store;

pub use error::BorrowError;
pub use memory::InMemoryLendingStore;
pub use store::LendingStore;

use std::future::Future;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::BorrowRecord;

#[derive(Clone)]
pub struct BorrowService {
    store: Arc<dyn LendingStore>,
}

impl BorrowService {
    pub fn new(store: Arc<dyn LendingStore>) -> Self {
        Self { store }
    }

    /// Lends one copy of `book_id` to `reader_id`.
    pub async fn borrow(&self, book_id: i32, reader_id: i32) -> Result<BorrowRecord, BorrowError> {
        let store = self.store.clone();
        let result = detached(async move {
            store.borrow(book_id, reader_id, jiff::Timestamp::now()).await
        })
        .await;

        match &result {
            Ok(record) => tracing::info!(
                borrow_id = record.id,
                book_id,
                reader_id,
                "Book borrowed"
            ),
            Err(e) => log_failure("borrow", e, book_id, reader_id),
        }
        result
    }

    /// Closes an active borrow and puts the copy back.
    pub async fn return_book(&self, borrow_id: i32) -> Result<BorrowRecord, BorrowError> {
        let store = self.store.clone();
        let result = detached(async move {
            store.return_borrow(borrow_id, jiff::Timestamp::now()).await
        })
        .await;

        match &result {
            Ok(record) => tracing::info!(
                borrow_id,
                book_id = record.book_id,
                reader_id = record.reader_id,
                "Book returned"
            ),
            Err(e) if e.is_store_failure() => {
                tracing::error!(borrow_id, error = %e, "Return failed and was rolled back")
            }
            Err(e) => tracing::warn!(borrow_id, error = %e, "Return refused"),
        }
        result
    }

    pub async fn list_active(&self, reader_id: i32) -> Result<Vec<BorrowRecord>, BorrowError> {
        self.store.active_borrows(reader_id).await.inspect_err(|e| {
            if e.is_store_failure() {
                tracing::error!(reader_id, error = %e, "Listing active borrows failed");
            }
        })
    }

    /// Current state of a record, returned or not.
    pub async fn get(&self, borrow_id: i32) -> Result<BorrowRecord, BorrowError> {
        self.store.get(borrow_id).await
    }
}

/// Runs `unit` to completion on its own task even if the caller goes away.
async fn detached<F, T>(unit: F) -> Result<T, BorrowError>
where
    F: Future<Output = Result<T, BorrowError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(unit).await.map_err(|e| {
        BorrowError::Store(AppError::Internal {
            source: anyhow::anyhow!("lending task failed: {}", e),
        })
    })?
}

fn log_failure(operation: &str, error: &BorrowError, book_id: i32, reader_id: i32) {
    if error.is_store_failure() {
        tracing::error!(operation, book_id, reader_id, error = %error, "Lending operation failed and was rolled back");
    } else {
        tracing::warn!(operation, book_id, reader_id, error = %error, "Lending operation refused");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service_with_store() -> (BorrowService, Arc<InMemoryLendingStore>) {
        let store = Arc::new(InMemoryLendingStore::new());
        (BorrowService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_borrow_then_return_restores_copies() {
        let (service, store) = service_with_store().await;
        let book = store.add_book(2).await;
        let reader = store.add_reader().await;

        let record = service.borrow(book, reader).await.unwrap();
        assert!(record.is_active());
        assert_eq!(store.copies_available(book).await, Some(1));

        let returned = service.return_book(record.id).await.unwrap();
        assert!(!returned.is_active());
        assert_eq!(store.copies_available(book).await, Some(2));
    }

    #[tokio::test]
    async fn test_get_reflects_return() {
        let (service, store) = service_with_store().await;
        let book = store.add_book(1).await;
        let reader = store.add_reader().await;

        let record = service.borrow(book, reader).await.unwrap();
        assert!(service.get(record.id).await.unwrap().is_active());
        service.return_book(record.id).await.unwrap();
        assert!(!service.get(record.id).await.unwrap().is_active());
        assert!(matches!(service.get(999).await, Err(BorrowError::RecordNotFound(999))));
    }

    #[tokio::test]
    async fn test_list_active_requires_reader() {
        let (service, _) = service_with_store().await;
        assert!(matches!(
            service.list_active(42).await,
            Err(BorrowError::ReaderNotFound(42))
        ));
    }
}
