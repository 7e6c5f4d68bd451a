//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, transaction::LedgerStore};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The symbol printed in front of every amount of money, e.g. "₹".
    pub currency_symbol: String,

    /// The ledger and the database connection it is saved to.
    pub ledger_store: Arc<Mutex<LedgerStore>>,
}

impl AppState {
    /// Create a new [AppState] from a SQLite database connection.
    ///
    /// This function will initialize the database and load the stored ledger.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or read.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        currency_symbol: &str,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let ledger_store = LedgerStore::load(db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            currency_symbol: currency_symbol.to_owned(),
            ledger_store: Arc::new(Mutex::new(ledger_store)),
        })
    }
}
