use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use jiff_diesel::ToDiesel;
use tokio::sync::Mutex;

use crate::models::BorrowRecord;
use crate::services::borrow::policy::{self, BorrowSnapshot};
use crate::services::borrow::{BorrowError, LendingStore};

/// `LendingStore` kept in process memory.
///
/// Test and reference backend: nothing is persisted, and the server always
/// wires `BorrowRepository` instead.
///
/// One mutex guards every map and is held for the whole check-then-mutate
/// sequence, which makes each operation atomic with respect to the others.
#[derive(Default)]
pub struct InMemoryLendingStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    copies: BTreeMap<i32, i32>,
    readers: BTreeSet<i32>,
    records: BTreeMap<i32, BorrowRecord>,
    next_book_id: i32,
    next_reader_id: i32,
    next_record_id: i32,
}

impl InMemoryLendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a book with `copies` available copies and returns its id.
    pub async fn add_book(&self, copies: i32) -> i32 {
        let mut state = self.state.lock().await;
        state.next_book_id += 1;
        let id = state.next_book_id;
        state.copies.insert(id, copies);
        id
    }

    pub async fn add_reader(&self) -> i32 {
        let mut state = self.state.lock().await;
        state.next_reader_id += 1;
        let id = state.next_reader_id;
        state.readers.insert(id);
        id
    }

    pub async fn copies_available(&self, book_id: i32) -> Option<i32> {
        self.state.lock().await.copies.get(&book_id).copied()
    }

    /// All records, returned or not, ordered by id.
    pub async fn records(&self) -> Vec<BorrowRecord> {
        self.state.lock().await.records.values().cloned().collect()
    }
}

impl State {
    fn active_count(&self, reader_id: i32) -> i64 {
        self.records
            .values()
            .filter(|r| r.reader_id == reader_id && r.is_active())
            .count() as i64
    }
}

#[async_trait]
impl LendingStore for InMemoryLendingStore {
    async fn borrow(
        &self,
        book_id: i32,
        reader_id: i32,
        at: jiff::Timestamp,
    ) -> Result<BorrowRecord, BorrowError> {
        let mut state = self.state.lock().await;

        policy::check_borrow(&BorrowSnapshot {
            book_id,
            reader_id,
            copies_available: state.copies.get(&book_id).copied(),
            reader_exists: state.readers.contains(&reader_id),
            active_borrows: state.active_count(reader_id),
        })?;

        if let Some(copies) = state.copies.get_mut(&book_id) {
            *copies -= 1;
        }
        state.next_record_id += 1;
        let record = BorrowRecord {
            id: state.next_record_id,
            book_id,
            reader_id,
            borrow_date: at.to_diesel(),
            return_date: None,
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn return_borrow(
        &self,
        borrow_id: i32,
        at: jiff::Timestamp,
    ) -> Result<BorrowRecord, BorrowError> {
        let mut state = self.state.lock().await;

        let book_id = policy::check_return(borrow_id, state.records.get(&borrow_id))?.book_id;

        let copies = state
            .copies
            .get_mut(&book_id)
            .ok_or(BorrowError::BookNotFound(book_id))?;
        *copies += 1;

        let record = state
            .records
            .get_mut(&borrow_id)
            .ok_or(BorrowError::RecordNotFound(borrow_id))?;
        record.return_date = Some(at.to_diesel());
        Ok(record.clone())
    }

    async fn active_borrows(&self, reader_id: i32) -> Result<Vec<BorrowRecord>, BorrowError> {
        let state = self.state.lock().await;
        if !state.readers.contains(&reader_id) {
            return Err(BorrowError::ReaderNotFound(reader_id));
        }
        Ok(state
            .records
            .values()
            .filter(|r| r.reader_id == reader_id && r.is_active())
            .cloned()
            .collect())
    }

    async fn get(&self, borrow_id: i32) -> Result<BorrowRecord, BorrowError> {
        self.state
            .lock()
            .await
            .records
            .get(&borrow_id)
            .cloned()
            .ok_or(BorrowError::RecordNotFound(borrow_id))
    }
}
