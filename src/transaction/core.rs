//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The canonical `YYYY-MM-DD` format used to store, compare and display dates.
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Identifier for a transaction, unique within a ledger.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are created with [crate::transaction::Ledger::push] from a
/// validated [NewTransaction] and are never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short label for what the transaction was for.
    pub name: TransactionName,
    /// The amount of money spent or earned in this transaction.
    pub amount: Amount,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The category of the transaction, e.g. "Food", "Work", "Rent".
    pub category: Category,
}

/// A validated transaction that has not been given an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short label for what the transaction was for.
    pub name: TransactionName,
    /// The amount of money spent or earned.
    pub amount: Amount,
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// The category of the transaction.
    pub category: Category,
}

impl NewTransaction {
    pub(crate) fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            name: self.name,
            amount: self.amount,
            transaction_type: self.transaction_type,
            date: self.date,
            category: self.category,
        }
    }
}

/// The direction money moved in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    #[default]
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in forms, storage and CSV exports.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated, non-empty transaction name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionName(String);

impl TransactionName {
    /// Create a transaction name, surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTransactionName] if `name` is blank.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyTransactionName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }
}

/// A validated, non-empty category label.
///
/// Categories are compared exactly, so "Food" and "food" are different categories.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Create a category, surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategory] if `category` is blank.
    pub fn new(category: &str) -> Result<Self, Error> {
        let category = category.trim();

        if category.is_empty() {
            Err(Error::EmptyCategory)
        } else {
            Ok(Self(category.to_owned()))
        }
    }
}

macro_rules! impl_string_newtype {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_string_newtype!(TransactionName);
impl_string_newtype!(Category);

/// The largest amount a single transaction may have.
///
/// Together with [AMOUNT_DECIMAL_PLACES] this keeps every amount within 15
/// significant digits, which a JSON number (an `f64`) stores exactly.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// The number of decimal places an amount may have.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// A strictly positive amount of money with at most two decimal places.
///
/// Stored as a JSON number. Reading goes through the shortest decimal
/// representation of the number, so `0.1` is read back as exactly `0.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `value` is zero or negative,
    /// - [Error::AmountTooLarge] if `value` is greater than [MAX_AMOUNT],
    /// - or [Error::AmountTooPrecise] if `value` has more than two decimal places.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(value));
        }

        if value > MAX_AMOUNT {
            return Err(Error::AmountTooLarge(value));
        }

        let value = value.normalize();
        if value.scale() > AMOUNT_DECIMAL_PLACES {
            return Err(Error::AmountTooPrecise(value));
        }

        Ok(Self(value))
    }

    /// Parse an amount typed by a user, e.g. "12.50".
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidAmount] if `text` is not a decimal number,
    /// - or any error returned by [Amount::new] for the parsed number.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let text = text.trim();
        let value = Decimal::from_str(text).map_err(|_| Error::InvalidAmount(text.to_owned()))?;

        Self::new(value)
    }

    /// The amount as a decimal number.
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Parsing the decimal text rounds correctly, so amounts within
        // MAX_AMOUNT come back unchanged when read.
        let number = f64::from_str(&self.0.to_string()).map_err(serde::ser::Error::custom)?;

        serializer.serialize_f64(number)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = f64::deserialize(deserializer)?;

        if !number.is_finite() {
            return Err(de::Error::custom(format!("{number} is not a finite amount")));
        }

        let value = Decimal::from_str(&number.to_string()).map_err(de::Error::custom)?;

        Amount::new(value).map_err(de::Error::custom)
    }
}

/// Parse a `YYYY-MM-DD` calendar date typed by a user.
///
/// # Errors
///
/// This function will return an [Error::InvalidDate] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Format `date` in the canonical `YYYY-MM-DD` form.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
