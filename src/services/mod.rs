//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod book_service;
pub mod borrow;
mod reader_service;
mod user_service;

pub use book_service::BookService;
pub use borrow::{BorrowError, BorrowService, LendingStore};
/// In-process lending backend for tests and as a reference implementation;
/// production state goes through `repositories::BorrowRepository`.
pub use borrow::InMemoryLendingStore;
pub use reader_service::ReaderService;
pub use user_service::{TokenPair, UserService};

use std::sync::Arc;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub books: BookService,
    pub readers: ReaderService,
    pub borrows: BorrowService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.users),
            books: BookService::new(repos.books),
            readers: ReaderService::new(repos.readers),
            borrows: BorrowService::new(Arc::new(repos.borrows)),
        }
    }
}
