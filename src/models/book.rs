use diesel::prelude::*;

/// Book row. `copies_available` is guarded by the `copies_available_non_negative` check.
#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub copies_available: i32,
    pub description: Option<String>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::books)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub copies_available: i32,
    pub description: Option<String>,
}

/// Partial update: `None` leaves the column untouched.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::books)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub copies_available: Option<i32>,
    pub description: Option<String>,
}

impl UpdateBook {
    /// Diesel refuses an empty changeset, so callers skip the UPDATE in that case.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.isbn.is_none()
            && self.copies_available.is_none()
            && self.description.is_none()
    }
}
