//! Defines the endpoint for deleting a transaction from the ledger.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, Error, endpoints};

use super::{
    core::TransactionId,
    filter::{FilterQuery, TransactionFilter},
    ledger::LedgerStore,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The ledger and the database connection it is saved to.
    ledger_store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger_store: state.ledger_store.clone(),
        }
    }
}

/// A route handler for deleting a transaction, redirects back to the ledger page
/// with the same filter.
///
/// Deleting a transaction that does not exist changes nothing.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = TransactionFilter::from_query(&query)?;

    let mut store = state
        .ledger_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let removed = store.remove(transaction_id).inspect_err(|error| {
        tracing::error!("Could not delete transaction {transaction_id}: {error}")
    })?;

    match removed {
        Some(transaction) => tracing::info!(
            "Deleted transaction {transaction_id} \"{}\"",
            transaction.name
        ),
        None => tracing::debug!("Transaction {transaction_id} was already deleted"),
    }

    Ok(Redirect::to(&filter.to_url(endpoints::TRANSACTIONS_VIEW)).into_response())
}
