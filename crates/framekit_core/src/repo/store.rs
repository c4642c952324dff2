//! Shared SQLite store handle, repository errors and the unit of work.
//!
//! # Responsibility
//! - Own the connection reference used by frame and circle repositories.
//! - Provide the transaction boundary that makes admission atomic.
//!
//! # Invariants
//! - The store is only constructed over a fully migrated connection.
//! - A failed unit of work leaves no writes behind.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::circle::CircleId;
use crate::model::frame::FrameId;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from frame/circle persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    FrameNotFound(FrameId),
    CircleNotFound(CircleId),
    /// Foreign key rejected removal of a frame that still owns circles.
    FrameReferenced(FrameId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::FrameNotFound(id) => write!(f, "frame not found: {id}"),
            Self::CircleNotFound(id) => write!(f, "circle not found: {id}"),
            Self::FrameReferenced(id) => {
                write!(f, "frame {id} is still referenced by circles")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "region store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "region store requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted region data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Transaction boundaries for services.
///
/// Writes go through [`UnitOfWork::atomically`]; reads spanning more than one
/// statement go through [`UnitOfWork::snapshot`]. Single-statement reads need
/// neither.
pub trait UnitOfWork {
    /// Runs `work` so that every read it performs and every write it issues
    /// form one atomic step. Any `Err` from `work` discards its writes.
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;

    /// Runs read-only `work` against one consistent view without taking the
    /// write lock.
    fn snapshot<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed store for frames and circles.
///
/// Cheap to copy; it only borrows the connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteRegionStore<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteRegionStore<'conn> {
    /// Creates the store over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UnitOfWork for SqliteRegionStore<'_> {
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        // IMMEDIATE: the write lock is held from the first admission read.
        self.within(TransactionBehavior::Immediate, work)
    }

    fn snapshot<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.within(TransactionBehavior::Deferred, work)
    }
}

impl SqliteRegionStore<'_> {
    /// Dropping the transaction on `Err` rolls it back.
    fn within<T, E, F>(&self, behavior: TransactionBehavior, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(self.conn, behavior).map_err(RepoError::from)?;
        let value = work(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["frames", "circles"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_stored_decimal(value: &str, column: &'static str) -> RepoResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid decimal `{value}` in {column}")))
}
