//! SQLite storage bootstrap and connection sourcing.
//!
//! # Responsibility
//! - Define the `ConnectionProvider` seam repositories acquire connections from.
//! - Open and configure SQLite connections for delivery employee storage.
//! - Bootstrap the `employee`/`delivery_employee` schema idempotently.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON` and the schema in place.
//! - Dropping a provided connection releases it; callers never close explicitly.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod config;
mod open;
mod provider;
pub mod schema;

pub use config::{StoreConfig, DEFAULT_BUSY_TIMEOUT_MS};
pub use open::{open_db, open_db_in_memory, open_db_with_config};
pub use provider::{ConnectionProvider, FileConnectionProvider};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    InvalidConfig(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidConfig(message) => write!(f, "invalid store config: {message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
