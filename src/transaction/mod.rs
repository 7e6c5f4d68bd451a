//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated types it is built from
//! - The `Ledger` and the `LedgerStore` that saves it to the database
//! - Filtering, monthly summaries and CSV export
//! - The route handlers for the ledger page and its forms

mod core;
mod create_endpoint;
mod delete_endpoint;
mod export;
mod export_endpoint;
mod filter;
mod form;
mod ledger;
mod summary;
mod transactions_page;
mod view;

#[cfg(test)]
mod test_utils;

pub use core::{
    AMOUNT_DECIMAL_PLACES, Amount, Category, DATE_FORMAT, MAX_AMOUNT, NewTransaction, Transaction,
    TransactionId, TransactionName, TransactionType, format_date, parse_date,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use export::{CSV_HEADER, export_csv};
pub use export_endpoint::export_transactions_endpoint;
pub use filter::{CategoryFilter, FilterQuery, TransactionFilter, filter_transactions};
pub use form::TransactionForm;
pub use ledger::{
    LEDGER_KEY, Ledger, LedgerStore, LoadOutcome, MALFORMED_LEDGER_KEY, MalformedLedger,
    MalformedReason, load_ledger,
};
pub use summary::{MonthKey, MonthlyTotals, Summary, balance, summarize};
pub use transactions_page::get_transactions_page;
