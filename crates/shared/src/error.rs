#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{field}: {message}")]
    Field { field: &'static str, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<std::time::SystemTimeError> for Error {
    fn from(value: std::time::SystemTimeError) -> Self {
        Self::Unknown(value.into())
    }
}

/// Integrity rule a failed statement ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Unique,
    ForeignKey,
    Check,
}

const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

/// Classifies a database error by the constraint that rejected it, if any.
pub fn violated_constraint(err: &sqlx::Error) -> Option<Constraint> {
    let db_err = err.as_database_error()?;

    if db_err.is_unique_violation() {
        return Some(Constraint::Unique);
    }

    // ON DELETE RESTRICT fails with SQLITE_CONSTRAINT_TRIGGER, not SQLITE_CONSTRAINT_FOREIGNKEY
    if db_err.is_foreign_key_violation()
        || db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER)
    {
        return Some(Constraint::ForeignKey);
    }

    if db_err.is_check_violation() {
        return Some(Constraint::Check);
    }

    None
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Server(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! not_found {
    ($($arg:tt)*) => {
        return Err($crate::Error::NotFound(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! forbidden {
    ($($arg:tt)*) => {
        return Err($crate::Error::Forbidden(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! conflict {
    ($($arg:tt)*) => {
        return Err($crate::Error::Conflict(format!($($arg)*)))
    };
}

/// Rejects a single field, `invalid!("tags", "unknown tag {id}")`.
#[macro_export]
macro_rules! invalid {
    ($field:literal, $($arg:tt)*) => {
        return Err($crate::Error::Field {
            field: $field,
            message: format!($($arg)*),
        })
    };
}
