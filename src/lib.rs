//! Budget Ledger is a web app for recording income and expenses.
//!
//! This library provides a server that directly serves HTML pages: a single
//! ledger page that lists, filters and summarises transactions, plus form
//! endpoints for adding and deleting transactions and downloading the ledger
//! as CSV. The ledger is saved to SQLite as a single JSON document.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod db;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod key_value;
mod logging;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    AMOUNT_DECIMAL_PLACES, Amount, CSV_HEADER, Category, CategoryFilter, DATE_FORMAT, FilterQuery,
    LEDGER_KEY, Ledger, LedgerStore, LoadOutcome, MALFORMED_LEDGER_KEY, MAX_AMOUNT,
    MalformedLedger, MalformedReason, MonthKey, MonthlyTotals, NewTransaction, Summary,
    Transaction, TransactionFilter, TransactionForm, TransactionId, TransactionName,
    TransactionType, balance, export_csv, filter_transactions, format_date, load_ledger,
    parse_date, summarize,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
