mod book_service;
mod errors;

pub use book_service::{
    ServiceDependencies, create_book, delete_book, get_book, list_books, update_book,
};
pub use errors::{BookApplicationError, Result};
