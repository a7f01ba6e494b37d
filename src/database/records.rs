use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::codec::Record;
use crate::errors::{with_record_context, with_store_context};

/// Registered actors
pub const ACTORS_TABLE: &str = "actors";
/// Snapshot of the tournament in progress
pub const TOURNAMENT_TABLE: &str = "tournament";
/// Finished tournaments
pub const ARCHIVE_TABLE: &str = "tournaments";

pub fn insert(conn: &Connection, table: &str, record: &Record) -> Result<()> {
    let body = serde_json::to_string(record).context("Failed to encode record")?;
    let sql = "INSERT INTO records (table_name, body) VALUES (?1, ?2)";

    with_store_context(conn.execute(sql, params![table, body]), "insert into", table)?;
    Ok(())
}

/// Every record of `table`, in insertion order
pub fn all(conn: &Connection, table: &str) -> Result<Vec<Record>> {
    let sql = "SELECT body FROM records WHERE table_name = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let bodies = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>();
    let bodies = with_store_context(bodies, "read", table)?;

    bodies
        .iter()
        .map(|body| with_record_context(serde_json::from_str::<Record>(body), table))
        .collect()
}

/// Remove every record of `table`, returning how many were dropped
pub fn truncate(conn: &Connection, table: &str) -> Result<usize> {
    let sql = "DELETE FROM records WHERE table_name = ?1";
    with_store_context(conn.execute(sql, params![table]), "truncate", table)
}
