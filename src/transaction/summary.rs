//! Balance and per-month totals over a set of transactions.

use std::{collections::BTreeMap, fmt::Display};

use rust_decimal::Decimal;
use time::Date;

use crate::Error;

use super::core::{Transaction, TransactionType};

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    /// The calendar year.
    pub year: i32,
    /// The month of the year, 1 to 12.
    pub month: u8,
}

impl From<Date> for MonthKey {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month().into(),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The income and expense totals for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotals {
    /// The month the totals cover.
    pub month: MonthKey,
    /// The sum of income amounts.
    pub income: Decimal,
    /// The sum of expense amounts, as a positive number.
    pub expense: Decimal,
}

/// The balance and monthly totals of a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Total income minus total expenses.
    pub balance: Decimal,
    /// One entry per month that has at least one transaction, oldest first.
    pub months: Vec<MonthlyTotals>,
}

/// Total income minus total expenses over `transactions`.
///
/// # Errors
/// Returns [Error::TotalOverflow] if the total does not fit in a [Decimal].
pub fn balance<'a, I>(transactions: I) -> Result<Decimal, Error>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .try_fold(Decimal::ZERO, |total, transaction| {
            checked_add(total, signed_amount(transaction))
        })
}

/// Compute the balance and the per-month income and expense totals of `transactions`.
///
/// # Errors
/// Returns [Error::TotalOverflow] if a total does not fit in a [Decimal].
pub fn summarize<'a, I>(transactions: I) -> Result<Summary, Error>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut balance = Decimal::ZERO;
    let mut months: BTreeMap<MonthKey, (Decimal, Decimal)> = BTreeMap::new();

    for transaction in transactions {
        balance = checked_add(balance, signed_amount(transaction))?;

        let (income, expense) = months.entry(MonthKey::from(transaction.date)).or_default();
        let total = match transaction.transaction_type {
            TransactionType::Income => income,
            TransactionType::Expense => expense,
        };
        *total = checked_add(*total, transaction.amount.value())?;
    }

    Ok(Summary {
        balance,
        months: months
            .into_iter()
            .map(|(month, (income, expense))| MonthlyTotals {
                month,
                income,
                expense,
            })
            .collect(),
    })
}

fn signed_amount(transaction: &Transaction) -> Decimal {
    match transaction.transaction_type {
        TransactionType::Income => transaction.amount.value(),
        TransactionType::Expense => -transaction.amount.value(),
    }
}

fn checked_add(total: Decimal, amount: Decimal) -> Result<Decimal, Error> {
    total.checked_add(amount).ok_or_else(|| {
        tracing::error!("Adding {amount} to {total} overflowed");
        Error::TotalOverflow
    })
}
