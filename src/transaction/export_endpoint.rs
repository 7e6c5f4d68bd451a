//! Defines the endpoint for downloading the ledger as a CSV file.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error};

use super::{export::export_csv, ledger::LedgerStore};

/// The name the browser saves the export as.
const EXPORT_FILE_NAME: &str = "transactions.csv";

/// The state needed to export the ledger.
#[derive(Debug, Clone)]
pub struct ExportTransactionsState {
    /// The ledger and the database connection it is saved to.
    pub ledger_store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for ExportTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger_store: state.ledger_store.clone(),
        }
    }
}

/// A route handler that responds with every transaction as a CSV attachment.
///
/// Responds with an error page if the ledger is empty.
pub async fn export_transactions_endpoint(
    State(state): State<ExportTransactionsState>,
) -> Result<Response, Error> {
    let csv = {
        let store = state
            .ledger_store
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        export_csv(store.ledger())?
    };

    tracing::info!("Exported {} bytes of CSV", csv.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv;charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
