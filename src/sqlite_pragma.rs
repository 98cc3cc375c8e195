//! Shared SQLite connection tuning

use rusqlite::Connection;

/// Apply the PRAGMAs used by connections that write the database
///
/// WAL journal, NORMAL sync, in-memory temp tables and a larger page cache.
/// Switching to WAL writes the database header.
pub fn apply_optimized_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    // journal_mode reports the applied mode back as a row
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "cache_size", -64_000i64)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// Connection-local PRAGMAs for read-only connections
///
/// Leaves the journal mode alone, so nothing is written to the file.
pub fn apply_reader_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "cache_size", -64_000i64)?;
    Ok(())
}
