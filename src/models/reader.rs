use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::readers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Reader {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::readers)]
pub struct NewReader {
    pub name: String,
    pub email: String,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::readers)]
pub struct UpdateReader {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateReader {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}
