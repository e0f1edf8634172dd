mod command;
pub mod password;
mod query;
pub(crate) mod repository;
pub mod subscription;

pub use command::*;
pub use query::*;
pub use repository::UserRow;
