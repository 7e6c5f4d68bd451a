//! Defines the route handler for the ledger page and the view model it renders.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use unicode_segmentation::UnicodeSegmentation;

use crate::{AppState, Error, endpoints, timezone::current_local_date};

use super::{
    core::{TransactionId, TransactionType, format_date},
    filter::{ALL_CATEGORIES, CategoryFilter, FilterQuery, TransactionFilter, filter_transactions},
    form::TransactionFormDefaults,
    ledger::{Ledger, LedgerStore},
    summary::{Summary, summarize},
    view::transactions_view,
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_NAME_GRAPHEMES: usize = 32;

/// The state needed for the ledger page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
    /// The symbol printed in front of amounts.
    pub currency_symbol: String,
    /// The ledger and the database connection it is saved to.
    pub ledger_store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            currency_symbol: state.currency_symbol.clone(),
            ledger_store: state.ledger_store.clone(),
        }
    }
}

/// An entry in the category select of the filter form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A transaction as shown in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransactionTableRow {
    pub id: TransactionId,
    /// The name, truncated for display.
    pub name: String,
    /// The full name if `name` was truncated.
    pub full_name: Option<String>,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub date: String,
    pub category: String,
    /// Posting to this URL deletes the transaction and returns to the current filter.
    pub delete_url: String,
}

/// Everything the ledger page needs, derived from the ledger and the active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LedgerViewModel {
    /// The filter that was applied, after dropping a category that no longer exists.
    pub filter: TransactionFilter,
    pub category_options: Vec<CategoryOption>,
    /// Every distinct category in the ledger.
    pub categories: Vec<String>,
    pub rows: Vec<TransactionTableRow>,
    pub summary: Summary,
    /// The URL the create form posts to, keeping the active filter.
    pub create_url: String,
}

/// Filter the ledger and compute everything shown on the ledger page.
///
/// A filter on a category that is not in the ledger is reset to all categories,
/// so the rows always agree with the category select.
///
/// # Errors
/// Returns [Error::TotalOverflow] if the totals of the filtered transactions overflow.
pub(crate) fn build_ledger_view_model(
    ledger: &Ledger,
    mut filter: TransactionFilter,
) -> Result<LedgerViewModel, Error> {
    let categories = ledger
        .categories()
        .into_iter()
        .map(|category| category.as_ref().to_owned())
        .collect::<Vec<_>>();

    let is_known_category = match &filter.category {
        CategoryFilter::All => true,
        CategoryFilter::Only(selected) => categories.contains(selected),
    };

    if !is_known_category {
        tracing::debug!(
            "Category {:?} is no longer in the ledger, showing all categories",
            filter.category
        );
        filter.category = CategoryFilter::All;
    }

    let selected_value = filter.category.as_query_value();
    let category_options = std::iter::once(CategoryOption {
        value: ALL_CATEGORIES.to_owned(),
        label: "All".to_owned(),
        selected: filter.category == CategoryFilter::All,
    })
    .chain(categories.iter().map(|category| CategoryOption {
        value: category.clone(),
        label: category.clone(),
        selected: filter.category != CategoryFilter::All && category == selected_value,
    }))
    .collect();

    let filtered = filter_transactions(ledger.transactions(), &filter);
    let summary = summarize(filtered.iter().copied())?;
    let rows = filtered
        .into_iter()
        .map(|transaction| {
            let (name, full_name) = truncate_name(transaction.name.as_ref());

            TransactionTableRow {
                id: transaction.id,
                name,
                full_name,
                amount: transaction.amount.value(),
                transaction_type: transaction.transaction_type,
                date: format_date(transaction.date),
                category: transaction.category.to_string(),
                delete_url: filter.to_url(&endpoints::format_endpoint(
                    endpoints::DELETE_TRANSACTION,
                    transaction.id,
                )),
            }
        })
        .collect();

    Ok(LedgerViewModel {
        create_url: filter.to_url(endpoints::TRANSACTIONS_API),
        filter,
        category_options,
        categories,
        rows,
        summary,
    })
}

fn truncate_name(name: &str) -> (String, Option<String>) {
    if name.graphemes(true).count() <= MAX_NAME_GRAPHEMES {
        (name.to_owned(), None)
    } else {
        let truncated: String = name.graphemes(true).take(MAX_NAME_GRAPHEMES - 3).collect();
        (truncated + "...", Some(name.to_owned()))
    }
}

/// Render the ledger page for `filter`.
///
/// Used by both the page handler and the create handler when the submitted
/// form is rejected.
pub(crate) fn render_transactions_page(
    ledger: &Ledger,
    filter: TransactionFilter,
    form_defaults: &TransactionFormDefaults,
    form_error: Option<&Error>,
    currency_symbol: &str,
    status_code: StatusCode,
) -> Result<Response, Error> {
    let view_model = build_ledger_view_model(ledger, filter)?;

    Ok((
        status_code,
        Html(
            transactions_view(&view_model, form_defaults, form_error, currency_symbol)
                .into_string(),
        ),
    )
        .into_response())
}

/// Render the ledger page with the transactions that match the filter in the query string.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = TransactionFilter::from_query(&query)?;
    let today = current_local_date(&state.local_timezone)?;

    let store = state
        .ledger_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    render_transactions_page(
        store.ledger(),
        filter,
        &TransactionFormDefaults::new(today),
        None,
        &state.currency_symbol,
        StatusCode::OK,
    )
}
