//! Narrowing the ledger down by date range and category.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

use super::core::{Transaction, format_date, parse_date};

/// The query string value that selects every category.
pub const ALL_CATEGORIES: &str = "all";

/// The raw filter values from the query string of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    /// The earliest date to include, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// The latest date to include, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// The category to include, or "all".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Which categories a filter lets through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// Only the category with exactly this name.
    Only(String),
}

impl CategoryFilter {
    fn from_query(category: Option<&str>) -> Self {
        match category {
            None | Some("") | Some(ALL_CATEGORIES) => CategoryFilter::All,
            Some(category) => CategoryFilter::Only(category.to_owned()),
        }
    }

    /// The value the category select should have selected.
    pub fn as_query_value(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }
}

/// An inclusive date range and a category selection.
///
/// The default filter lets every transaction through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// The earliest date to include.
    pub start: Option<Date>,
    /// The latest date to include.
    pub end: Option<Date>,
    /// The categories to include.
    pub category: CategoryFilter,
}

impl TransactionFilter {
    /// Parse the filter from the query string values.
    ///
    /// Empty values are treated the same as missing values.
    ///
    /// # Errors
    /// Returns an [Error::InvalidFilterDate] if a date is not a `YYYY-MM-DD` calendar date.
    pub fn from_query(query: &FilterQuery) -> Result<Self, Error> {
        Ok(Self {
            start: parse_filter_date(query.start.as_deref())?,
            end: parse_filter_date(query.end.as_deref())?,
            category: CategoryFilter::from_query(query.category.as_deref()),
        })
    }

    /// Whether `transaction` falls inside the date range and category selection.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.start.is_none_or(|start| transaction.date >= start)
            && self.end.is_none_or(|end| transaction.date <= end)
            && self.category.matches(transaction.category.as_ref())
    }

    /// The filter as query string values, leaving out anything that is not set.
    pub fn to_query(&self) -> FilterQuery {
        FilterQuery {
            start: self.start.map(format_date),
            end: self.end.map(format_date),
            category: match &self.category {
                CategoryFilter::All => None,
                CategoryFilter::Only(category) => Some(category.clone()),
            },
        }
    }

    /// The filter encoded as a query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self.to_query()).unwrap_or_else(|error| {
            tracing::error!("Could not encode the filter {self:?} as a query string: {error}");
            String::new()
        })
    }

    /// `route` with the filter appended as a query string.
    pub fn to_url(&self, route: &str) -> String {
        let query = self.to_query_string();

        if query.is_empty() {
            route.to_owned()
        } else {
            format!("{route}?{query}")
        }
    }
}

fn parse_filter_date(date: Option<&str>) -> Result<Option<Date>, Error> {
    match date.map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => parse_date(date)
            .map(Some)
            .map_err(|_| Error::InvalidFilterDate(date.to_owned())),
    }
}

/// The transactions that match `filter`, in their original order.
pub fn filter_transactions<'a, I>(
    transactions: I,
    filter: &TransactionFilter,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}
