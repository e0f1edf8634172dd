mod error;
pub mod pagination;
pub mod relation;

pub use error::*;
pub use pagination::{Page, PageArgs};

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

/// Seconds since the unix epoch, the timestamp format stored in every table.
pub fn now() -> Result<i64> {
    let elapsed = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?;

    Ok(elapsed.as_secs() as i64)
}
