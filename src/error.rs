//! Defines the app level error type and conversions to rendered HTML pages.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use rust_decimal::Decimal;

use crate::{html::error_view, internal_server_error::InternalServerError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty (or whitespace only) string was used as a transaction name.
    #[error("Transaction name cannot be empty")]
    EmptyTransactionName,

    /// An empty (or whitespace only) string was used as a category.
    #[error("Category cannot be empty")]
    EmptyCategory,

    /// The amount could not be parsed as a decimal number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// Transactions record money moving in one direction, the type says which
    /// direction, so the amount itself must always be greater than zero.
    #[error("the amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// The amount is larger than the largest amount a transaction may have.
    #[error("the amount must be at most 999999999999.99, got {0}")]
    AmountTooLarge(Decimal),

    /// The amount has more than two decimal places.
    #[error("the amount must have at most two decimal places, got {0}")]
    AmountTooPrecise(Decimal),

    /// The transaction type is neither "income" nor "expense".
    #[error("\"{0}\" is not a transaction type, expected income or expense")]
    InvalidTransactionType(String),

    /// The transaction date is missing or is not a `YYYY-MM-DD` calendar date.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A date range filter bound is not a `YYYY-MM-DD` calendar date.
    #[error("the filter date \"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidFilterDate(String),

    /// The user tried to export a ledger that has no transactions.
    #[error("there are no transactions to export")]
    EmptyLedgerExport,

    /// Every ID up to `i64::MAX` has been handed out.
    #[error("ran out of transaction IDs")]
    IdOverflow,

    /// A balance or monthly total is too large to be computed.
    #[error("the total of the transactions is too large")]
    TotalOverflow,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing the ledger as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing CSV data.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the ledger lock
    #[error("could not acquire the ledger lock")]
    DatabaseLockError,
}

impl Error {
    /// Whether the error was caused by invalid user input on the transaction form.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyTransactionName
                | Error::EmptyCategory
                | Error::InvalidAmount(_)
                | Error::NonPositiveAmount(_)
                | Error::AmountTooLarge(_)
                | Error::AmountTooPrecise(_)
                | Error::InvalidTransactionType(_)
                | Error::InvalidDate(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", error);
        Error::SqlError(error)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::EmptyLedgerExport => (
                StatusCode::BAD_REQUEST,
                Html(
                    error_view(
                        "Export Failed",
                        "Nothing to export",
                        "No transactions to export.",
                        "Add a transaction before exporting the ledger.",
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::InvalidFilterDate(date) => (
                StatusCode::BAD_REQUEST,
                Html(
                    error_view(
                        "Invalid Filter",
                        "400",
                        &format!("\"{date}\" is not a valid date."),
                        "Dates must be written as YYYY-MM-DD.",
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
