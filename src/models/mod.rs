mod book;
mod borrow_record;
mod reader;
mod user;

pub use book::{Book, NewBook, UpdateBook};
pub use borrow_record::{BorrowRecord, NewBorrowRecord};
pub use reader::{NewReader, Reader, UpdateReader};
pub use user::{NewUser, User};
