pub mod book;
pub mod errors;
pub mod query;
pub mod value_objects;

pub use book::*;
pub use errors::*;
pub use query::*;
pub use value_objects::*;
