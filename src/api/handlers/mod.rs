//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod books;
pub mod borrow;
pub mod health;
pub mod readers;
