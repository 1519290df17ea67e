#![allow(dead_code)]

use delivery_core::db::schema::apply_schema;
use delivery_core::{
    ConnectionProvider, DbError, DbResult, FileConnectionProvider, NewDeliveryEmployee,
    StoreConfig,
};
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Temporary on-disk store. Keep the guard alive for the test duration.
pub struct TestStore {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delivery.sqlite3");
        let conn = Connection::open(&path).unwrap();
        apply_schema(&conn).unwrap();
        Self { _dir: dir, path }
    }

    pub fn file_provider(&self) -> FileConnectionProvider {
        FileConnectionProvider::new(StoreConfig::new(&self.path)).unwrap()
    }

    pub fn raw_provider(&self) -> RawFileProvider {
        RawFileProvider {
            path: self.path.clone(),
        }
    }

    /// Direct connection for arranging and inspecting rows.
    pub fn conn(&self) -> Connection {
        let conn = Connection::open(&self.path).unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    pub fn count(&self, table: &str) -> i64 {
        self.conn()
            .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    pub fn insert_plain_employee(&self, employee_id: i64) {
        self.conn()
            .execute(
                "INSERT INTO employee (
                    employee_id, first_name, last_name, salary,
                    bank_account_number, national_insurance_number
                ) VALUES (?1, 'Plain', 'Staff', 21000.0, 'GB22CCCC22222222', 'QQ654321A');",
                [employee_id],
            )
            .unwrap();
    }
}

/// Opens the file without schema bootstrap, so dropped tables stay dropped.
pub struct RawFileProvider {
    path: PathBuf,
}

impl RawFileProvider {
    pub fn for_path(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ConnectionProvider for RawFileProvider {
    type Connection = Box<Connection>;

    fn get_connection(&self) -> DbResult<Self::Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Box::new(conn))
    }
}

/// Hands out connections until switched offline.
pub struct FlakyProvider<P> {
    pub inner: P,
    pub offline: AtomicBool,
}

impl<P> FlakyProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            offline: AtomicBool::new(false),
        }
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

impl<P: ConnectionProvider> ConnectionProvider for FlakyProvider<P> {
    type Connection = P::Connection;

    fn get_connection(&self) -> DbResult<Self::Connection> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DbError::InvalidConfig("provider offline".to_string()));
        }
        self.inner.get_connection()
    }
}

/// Tracks how many handed-out connections are still alive.
pub struct CountingProvider<P> {
    inner: P,
    live: Arc<AtomicUsize>,
    acquired: AtomicUsize,
}

impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            live: Arc::new(AtomicUsize::new(0)),
            acquired: AtomicUsize::new(0),
        }
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

pub struct CountedConnection<C> {
    conn: C,
    live: Arc<AtomicUsize>,
}

impl<C: Deref<Target = Connection>> Deref for CountedConnection<C> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl<C: DerefMut<Target = Connection>> DerefMut for CountedConnection<C> {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl<C> Drop for CountedConnection<C> {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<P: ConnectionProvider> ConnectionProvider for CountingProvider<P> {
    type Connection = CountedConnection<P::Connection>;

    fn get_connection(&self) -> DbResult<Self::Connection> {
        let conn = self.inner.get_connection()?;
        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(CountedConnection {
            conn,
            live: Arc::clone(&self.live),
        })
    }
}

pub fn ana() -> NewDeliveryEmployee {
    NewDeliveryEmployee::new("Ana", "Ruiz", 32000.0, "GB00AAAA00000000", "QQ123456C")
}

pub fn courier(n: usize) -> NewDeliveryEmployee {
    NewDeliveryEmployee::new(
        format!("Courier{n}"),
        "Fleet",
        25000.0 + n as f64,
        format!("GB00FLEET{n:07}"),
        format!("QQ{n:06}A"),
    )
}
