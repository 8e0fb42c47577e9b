//! PostgreSQL `LendingStore`.
//!
//! Every borrow/return is one transaction that row-locks what it reads before
//! deciding. Lock order is book then reader for a borrow and record then book
//! for a return, so concurrent units wait on each other instead of
//! deadlocking.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use jiff_diesel::ToDiesel;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{BorrowRecord, NewBorrowRecord};
use crate::schema::{books, borrow_records, readers};
use crate::services::borrow::policy::{self, BorrowSnapshot};
use crate::services::borrow::{BorrowError, LendingStore};

#[derive(Clone)]
pub struct BorrowRepository {
    pool: AsyncDbPool,
    lock_timeout_ms: u64,
}

impl BorrowRepository {
    pub fn new(pool: AsyncDbPool, lock_timeout_ms: u64) -> Self {
        Self {
            pool,
            lock_timeout_ms,
        }
    }

    pub async fn find_by_id(&self, borrow_id: i32) -> Result<Option<BorrowRecord>, AppError> {
        let mut conn = self.pool.get().await?;

        borrow_records::table
            .find(borrow_id)
            .select(BorrowRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// `None` when the reader does not exist.
    pub async fn find_active_by_reader(
        &self,
        reader_id: i32,
    ) -> Result<Option<Vec<BorrowRecord>>, AppError> {
        let mut conn = self.pool.get().await?;

        let reader = readers::table
            .find(reader_id)
            .select(readers::id)
            .first::<i32>(&mut conn)
            .await
            .optional()?;
        if reader.is_none() {
            return Ok(None);
        }

        borrow_records::table
            .filter(borrow_records::reader_id.eq(reader_id))
            .filter(borrow_records::return_date.is_null())
            .order(borrow_records::id.asc())
            .select(BorrowRecord::as_select())
            .load(&mut conn)
            .await
            .map(Some)
            .map_err(AppError::from)
    }
}

/// Bounds every row-lock wait of the surrounding transaction.
async fn set_lock_timeout(conn: &mut AsyncPgConnection, millis: u64) -> Result<(), BorrowError> {
    diesel::sql_query(format!("SET LOCAL lock_timeout = '{}ms'", millis))
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl LendingStore for BorrowRepository {
    async fn borrow(
        &self,
        book_id: i32,
        reader_id: i32,
        at: jiff::Timestamp,
    ) -> Result<BorrowRecord, BorrowError> {
        let mut pooled = self.pool.get().await.map_err(AppError::from)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let lock_timeout_ms = self.lock_timeout_ms;

        conn.transaction::<_, BorrowError, _>(|conn| {
            async move {
                set_lock_timeout(conn, lock_timeout_ms).await?;

                let copies_available = books::table
                    .find(book_id)
                    .select(books::copies_available)
                    .for_update()
                    .first::<i32>(conn)
                    .await
                    .optional()?;

                let reader_exists = readers::table
                    .find(reader_id)
                    .select(readers::id)
                    .for_update()
                    .first::<i32>(conn)
                    .await
                    .optional()?
                    .is_some();

                let active_borrows = if reader_exists {
                    borrow_records::table
                        .filter(borrow_records::reader_id.eq(reader_id))
                        .filter(borrow_records::return_date.is_null())
                        .count()
                        .get_result::<i64>(conn)
                        .await?
                } else {
                    0
                };

                policy::check_borrow(&BorrowSnapshot {
                    book_id,
                    reader_id,
                    copies_available,
                    reader_exists,
                    active_borrows,
                })?;

                diesel::update(books::table.find(book_id))
                    .set(books::copies_available.eq(books::copies_available - 1))
                    .execute(conn)
                    .await?;

                let record = diesel::insert_into(borrow_records::table)
                    .values(&NewBorrowRecord {
                        book_id,
                        reader_id,
                        borrow_date: at.to_diesel(),
                    })
                    .returning(BorrowRecord::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(record)
            }
            .scope_boxed()
        })
        .await
    }

    async fn return_borrow(
        &self,
        borrow_id: i32,
        at: jiff::Timestamp,
    ) -> Result<BorrowRecord, BorrowError> {
        let mut pooled = self.pool.get().await.map_err(AppError::from)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let lock_timeout_ms = self.lock_timeout_ms;

        conn.transaction::<_, BorrowError, _>(|conn| {
            async move {
                set_lock_timeout(conn, lock_timeout_ms).await?;

                let current = borrow_records::table
                    .find(borrow_id)
                    .select(BorrowRecord::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                policy::check_return(borrow_id, current.as_ref())?;

                let record = diesel::update(borrow_records::table.find(borrow_id))
                    .set(borrow_records::return_date.eq(Some(at.to_diesel())))
                    .returning(BorrowRecord::as_returning())
                    .get_result(conn)
                    .await?;

                let restored = diesel::update(books::table.find(record.book_id))
                    .set(books::copies_available.eq(books::copies_available + 1))
                    .execute(conn)
                    .await?;
                if restored != 1 {
                    return Err(BorrowError::BookNotFound(record.book_id));
                }

                Ok(record)
            }
            .scope_boxed()
        })
        .await
    }

    async fn active_borrows(&self, reader_id: i32) -> Result<Vec<BorrowRecord>, BorrowError> {
        self.find_active_by_reader(reader_id)
            .await?
            .ok_or(BorrowError::ReaderNotFound(reader_id))
    }

    async fn get(&self, borrow_id: i32) -> Result<BorrowRecord, BorrowError> {
        self.find_by_id(borrow_id)
            .await?
            .ok_or(BorrowError::RecordNotFound(borrow_id))
    }
}
