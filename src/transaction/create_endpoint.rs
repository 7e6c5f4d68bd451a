//! Defines the endpoint for adding a transaction to the ledger.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
// axum_extra's Form reads repeated and empty fields the way browsers send them.
use axum_extra::extract::Form;

use crate::{AppState, Error, endpoints};

use super::{
    filter::{FilterQuery, TransactionFilter},
    form::TransactionForm,
    ledger::LedgerStore,
    transactions_page::render_transactions_page,
};

/// The state needed to add a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The ledger and the database connection it is saved to.
    pub ledger_store: Arc<Mutex<LedgerStore>>,
    /// The symbol printed in front of amounts when the page is re-rendered.
    pub currency_symbol: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger_store: state.ledger_store.clone(),
            currency_symbol: state.currency_symbol.clone(),
        }
    }
}

/// A route handler for adding a transaction.
///
/// Redirects back to the ledger page with the same filter on success. If the
/// form is invalid, the ledger page is rendered with the submitted values and
/// an error message instead.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Query(query): Query<FilterQuery>,
    Form(form): Form<TransactionForm>,
) -> Result<Response, Error> {
    let filter = TransactionFilter::from_query(&query)?;

    let mut store = state
        .ledger_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let new_transaction = match form.validate() {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("Rejected transaction form {form:?}: {error}");

            return render_transactions_page(
                store.ledger(),
                filter,
                &form.into(),
                Some(&error),
                &state.currency_symbol,
                StatusCode::BAD_REQUEST,
            );
        }
    };

    let transaction = store
        .add(new_transaction)
        .inspect_err(|error| tracing::error!("could not add transaction: {error}"))?;

    tracing::info!(
        "Added {} transaction {} \"{}\"",
        transaction.transaction_type,
        transaction.id,
        transaction.name
    );

    Ok(Redirect::to(&filter.to_url(endpoints::TRANSACTIONS_VIEW)).into_response())
}
