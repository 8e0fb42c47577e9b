//! Reader registry operations.

use crate::error::{AppError, AppResult};
use crate::models::{NewReader, Reader, UpdateReader};
use crate::repositories::ReaderRepository;

#[derive(Clone)]
pub struct ReaderService {
    repo: ReaderRepository,
}

impl ReaderService {
    pub fn new(repo: ReaderRepository) -> Self {
        Self { repo }
    }

    pub async fn create_reader(&self, new_reader: NewReader) -> AppResult<Reader> {
        self.ensure_email_free(&new_reader.email).await?;
        let reader = self.repo.create(new_reader).await?;
        tracing::info!(reader_id = reader.id, "Reader created");
        Ok(reader)
    }

    pub async fn get_reader(&self, id: i32) -> AppResult<Reader> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_by_id("reader", id))
    }

    pub async fn list_readers(&self, skip: i64, limit: i64) -> AppResult<Vec<Reader>> {
        self.repo.list(skip, limit).await
    }

    pub async fn update_reader(&self, id: i32, changes: UpdateReader) -> AppResult<Reader> {
        let current = self.get_reader(id).await?;
        if let Some(email) = &changes.email
            && *email != current.email
        {
            self.ensure_email_free(email).await?;
        }

        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found_by_id("reader", id))
    }

    /// Refused by the store while borrow records reference the reader.
    pub async fn delete_reader(&self, id: i32) -> AppResult<()> {
        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found_by_id("reader", id));
        }
        tracing::info!(reader_id = id, "Reader deleted");
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> AppResult<()> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Duplicate {
                entity: "reader".to_string(),
                field: "email".to_string(),
                value: email.to_string(),
            });
        }
        Ok(())
    }
}
