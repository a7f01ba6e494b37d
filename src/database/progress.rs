use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

pub fn set_progress(conn: &Connection, table: &str, step: u32) -> Result<()> {
    let sql = "INSERT INTO progress (table_name, step) VALUES (?1, ?2)
               ON CONFLICT(table_name) DO UPDATE SET step = excluded.step, updated_at = CURRENT_TIMESTAMP";

    conn.execute(sql, params![table, step])
        .context("Failed to store progress marker")?;
    Ok(())
}

pub fn get_progress(conn: &Connection, table: &str) -> Result<Option<u32>> {
    let sql = "SELECT step FROM progress WHERE table_name = ?1";

    conn.query_row(sql, params![table], |row| row.get(0))
        .optional()
        .context("Failed to read progress marker")
}

pub fn clear_progress(conn: &Connection, table: &str) -> Result<()> {
    conn.execute("DELETE FROM progress WHERE table_name = ?1", params![table])
        .context("Failed to clear progress marker")?;
    Ok(())
}
