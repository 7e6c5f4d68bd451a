//! Sets up the SQLite database that backs the key-value store.

use rusqlite::Connection;

use crate::{Error, key_value::create_key_value_table};

/// Create the tables the application needs if they do not exist yet.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_key_value_table(connection)?;

    Ok(())
}
