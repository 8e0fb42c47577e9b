//! Book repository for async database operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Book, NewBook, UpdateBook};

#[derive(Clone)]
pub struct BookRepository {
    pool: AsyncDbPool,
}

impl BookRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_book: NewBook) -> Result<Book, AppError> {
        use crate::schema::books::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(books)
            .values(&new_book)
            .returning(Book::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, book_id: i32) -> Result<Option<Book>, AppError> {
        use crate::schema::books::dsl::*;
        let mut conn = self.pool.get().await?;

        books
            .filter(id.eq(book_id))
            .select(Book::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn find_by_isbn(&self, book_isbn: &str) -> Result<Option<Book>, AppError> {
        use crate::schema::books::dsl::*;
        let mut conn = self.pool.get().await?;

        books
            .filter(isbn.eq(book_isbn))
            .select(Book::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Page of books ordered by id.
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Book>, AppError> {
        use crate::schema::books::dsl::*;
        let mut conn = self.pool.get().await?;

        books
            .order(id.asc())
            .offset(skip)
            .limit(limit)
            .select(Book::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Applies the non-`None` fields. Returns `None` when the row is gone.
    pub async fn update(&self, book_id: i32, changes: UpdateBook) -> Result<Option<Book>, AppError> {
        if changes.is_empty() {
            return self.find_by_id(book_id).await;
        }

        use crate::schema::books::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(books.filter(id.eq(book_id)))
            .set(&changes)
            .returning(Book::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Returns the number of deleted rows (0 or 1).
    pub async fn delete(&self, book_id: i32) -> Result<usize, AppError> {
        use crate::schema::books::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(books.filter(id.eq(book_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
