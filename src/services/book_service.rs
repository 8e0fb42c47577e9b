//! Book catalogue operations.

use crate::error::{AppError, AppResult};
use crate::models::{Book, NewBook, UpdateBook};
use crate::repositories::BookRepository;

#[derive(Clone)]
pub struct BookService {
    repo: BookRepository,
}

impl BookService {
    pub fn new(repo: BookRepository) -> Self {
        Self { repo }
    }

    pub async fn create_book(&self, new_book: NewBook) -> AppResult<Book> {
        if let Some(isbn) = &new_book.isbn {
            self.ensure_isbn_free(isbn).await?;
        }
        let book = self.repo.create(new_book).await?;
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_by_id("book", id))
    }

    pub async fn list_books(&self, skip: i64, limit: i64) -> AppResult<Vec<Book>> {
        self.repo.list(skip, limit).await
    }

    /// Partial update; an ISBN is only checked for uniqueness when it changes.
    pub async fn update_book(&self, id: i32, changes: UpdateBook) -> AppResult<Book> {
        let current = self.get_book(id).await?;
        if let Some(isbn) = &changes.isbn
            && current.isbn.as_deref() != Some(isbn.as_str())
        {
            self.ensure_isbn_free(isbn).await?;
        }

        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found_by_id("book", id))
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found_by_id("book", id));
        }
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn ensure_isbn_free(&self, isbn: &str) -> AppResult<()> {
        if self.repo.find_by_isbn(isbn).await?.is_some() {
            return Err(AppError::Duplicate {
                entity: "book".to_string(),
                field: "isbn".to_string(),
                value: isbn.to_string(),
            });
        }
        Ok(())
    }
}
