mod command;
pub mod favorite;
pub mod image;
pub mod ingredient;
mod query;
pub mod tag;

pub use command::*;
pub use query::*;
