//! A string key-value store kept in a single SQLite table.
//!
//! Writes replace the whole value for a key, so the last write wins.

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

/// Create the key-value table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Get the value stored under `key`, or `None` if nothing has been stored yet.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_value(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .query_row(
            "SELECT value FROM key_value WHERE key = :key",
            &[(":key", &key)],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Store `value` under `key`, replacing any previous value.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn set_value(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO key_value (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, value),
    )?;

    Ok(())
}
