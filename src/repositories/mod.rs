//! Repository layer for data access operations.
//!
//! Entity repositories return `Option` for lookups and leave business rules
//! to the services. `BorrowRepository` is the exception: it is the PostgreSQL
//! `LendingStore` and applies the lending policy inside its transactions.

mod book_repo;
mod borrow_repo;
mod reader_repo;
mod user_repo;

pub use book_repo::BookRepository;
pub use borrow_repo::BorrowRepository;
pub use reader_repo::ReaderRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub books: BookRepository,
    pub readers: ReaderRepository,
    pub borrows: BorrowRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool, lock_timeout_ms: u64) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            books: BookRepository::new(pool.clone()),
            readers: ReaderRepository::new(pool.clone()),
            borrows: BorrowRepository::new(pool, lock_timeout_ms),
        }
    }
}
