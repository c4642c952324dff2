//! Ordered schema steps for the region database.
//!
//! `0001_frames` creates the frame table. `0002_circles` adds circles with a
//! restricting foreign key to their frame and an index on `frame_uuid`, which
//! every sibling scan and frame summary filters by.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "0001_frames",
        sql: include_str!("0001_frames.sql"),
    },
    Migration {
        version: 2,
        name: "0002_circles",
        sql: include_str!("0002_circles.sql"),
    },
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`] in a single transaction.
///
/// A database already at the latest version is left untouched; one from a
/// newer build is refused.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }
    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending(current_version) {
        apply_one(&tx, migration)?;
    }
    tx.commit()?;
    Ok(())
}

fn pending(current_version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > current_version)
}

fn apply_one(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    tx.execute_batch(migration.sql)
        .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
        .map_err(|source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        })?;
    info!(
        "event=db_migrate module=db status=ok version={} name={}",
        migration.version, migration.name
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
