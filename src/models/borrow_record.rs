use diesel::prelude::*;
use jiff_diesel::Timestamp;

/// One lending of one book copy to one reader.
///
/// A record is active while `return_date` is `None`; the return operation
/// sets it exactly once and records are never deleted.
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::borrow_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BorrowRecord {
    pub id: i32,
    pub book_id: i32,
    pub reader_id: i32,
    pub borrow_date: Timestamp,
    pub return_date: Option<Timestamp>,
}

impl BorrowRecord {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::borrow_records)]
pub struct NewBorrowRecord {
    pub book_id: i32,
    pub reader_id: i32,
    pub borrow_date: Timestamp,
}
