use rust_decimal::Decimal;

use super::{Amount, Category, NewTransaction, TransactionName, TransactionType, parse_date};

/// Build a valid [NewTransaction] from plain values, panicking on invalid input.
#[track_caller]
pub(crate) fn new_transaction(
    name: &str,
    amount: i64,
    transaction_type: &str,
    date: &str,
    category: &str,
) -> NewTransaction {
    let transaction_type = match transaction_type {
        "income" => TransactionType::Income,
        "expense" => TransactionType::Expense,
        other => panic!("unknown transaction type {other:?}"),
    };

    NewTransaction {
        name: TransactionName::new(name).unwrap(),
        amount: Amount::new(Decimal::from(amount)).unwrap(),
        transaction_type,
        date: parse_date(date).unwrap(),
        category: Category::new(category).unwrap(),
    }
}
