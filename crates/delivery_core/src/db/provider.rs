//! Connection sourcing for repositories.
//!
//! # Responsibility
//! - Hand out ready-to-use connections on demand.
//! - Let callers plug in their own sourcing (pool guards, test doubles).
//!
//! # Invariants
//! - Dropping a provided connection releases it back to its source.
//! - Providers are shareable across threads.

use super::config::StoreConfig;
use super::open::open_db_with_config;
use super::DbResult;
use rusqlite::Connection;
use std::ops::DerefMut;
use std::sync::Arc;

/// Source of live database connections.
///
/// Implementations may be called at arbitrary frequency from several threads.
pub trait ConnectionProvider: Send + Sync {
    /// Handle returned by `get_connection`. Dropping it releases the connection.
    type Connection: DerefMut<Target = Connection>;

    fn get_connection(&self) -> DbResult<Self::Connection>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    type Connection = P::Connection;

    fn get_connection(&self) -> DbResult<Self::Connection> {
        (**self).get_connection()
    }
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for Arc<P> {
    type Connection = P::Connection;

    fn get_connection(&self) -> DbResult<Self::Connection> {
        (**self).get_connection()
    }
}

/// Opens a new connection to one SQLite file per request.
#[derive(Debug, Clone)]
pub struct FileConnectionProvider {
    config: StoreConfig,
}

impl FileConnectionProvider {
    /// Validates `config` up front so misconfiguration surfaces at wiring time.
    pub fn new(config: StoreConfig) -> DbResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl ConnectionProvider for FileConnectionProvider {
    type Connection = Box<Connection>;

    fn get_connection(&self) -> DbResult<Self::Connection> {
        open_db_with_config(&self.config).map(Box::new)
    }
}
