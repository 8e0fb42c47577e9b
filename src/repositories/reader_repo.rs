//! Reader repository for async database operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Reader, NewReader, UpdateReader};

#[derive(Clone)]
pub struct ReaderRepository {
    pool: AsyncDbPool,
}

impl ReaderRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_reader: NewReader) -> Result<Reader, AppError> {
        use crate::schema::readers::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(readers)
            .values(&new_reader)
            .returning(Reader::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, reader_id: i32) -> Result<Option<Reader>, AppError> {
        use crate::schema::readers::dsl::*;
        let mut conn = self.pool.get().await?;

        readers
            .filter(id.eq(reader_id))
            .select(Reader::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn find_by_email(&self, reader_email: &str) -> Result<Option<Reader>, AppError> {
        use crate::schema::readers::dsl::*;
        let mut conn = self.pool.get().await?;

        readers
            .filter(email.eq(reader_email))
            .select(Reader::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Page of readers ordered by id.
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Reader>, AppError> {
        use crate::schema::readers::dsl::*;
        let mut conn = self.pool.get().await?;

        readers
            .order(id.asc())
            .offset(skip)
            .limit(limit)
            .select(Reader::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Applies the non-`None` fields. Returns `None` when the row is gone.
    pub async fn update(&self, reader_id: i32, changes: UpdateReader) -> Result<Option<Reader>, AppError> {
        if changes.is_empty() {
            return self.find_by_id(reader_id).await;
        }

        use crate::schema::readers::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(readers.filter(id.eq(reader_id)))
            .set(&changes)
            .returning(Reader::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Returns the number of deleted rows (0 or 1).
    pub async fn delete(&self, reader_id: i32) -> Result<usize, AppError> {
        use crate::schema::readers::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(readers.filter(id.eq(reader_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
