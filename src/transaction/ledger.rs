//! The ledger of transactions and the store that keeps it in the key-value table.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::{
    Error,
    key_value::{get_value, set_value},
};

use super::core::{Category, NewTransaction, Transaction, TransactionId};

/// The key the ledger is stored under.
pub const LEDGER_KEY: &str = "transactions";

/// The key a malformed ledger is copied to before it is replaced.
pub const MALFORMED_LEDGER_KEY: &str = "transactions.malformed";

/// The insertion-ordered list of transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    /// `None` once `i64::MAX` has been handed out.
    next_id: Option<TransactionId>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_id: Some(1),
        }
    }

    /// Create a ledger from previously stored transactions.
    ///
    /// New IDs continue after the largest existing ID.
    ///
    /// # Errors
    /// Returns the first ID that appears more than once.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self, TransactionId> {
        let mut seen = HashSet::with_capacity(transactions.len());

        for transaction in &transactions {
            if !seen.insert(transaction.id) {
                return Err(transaction.id);
            }
        }

        let next_id = transactions
            .iter()
            .map(|transaction| transaction.id)
            .max()
            .map_or(Some(1), |max_id| max_id.checked_add(1));

        Ok(Self {
            transactions,
            next_id,
        })
    }

    /// Append `transaction` with a fresh ID and return the stored transaction.
    ///
    /// # Errors
    /// Returns [Error::IdOverflow] once every ID has been used.
    pub fn push(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let id = self.next_id.ok_or(Error::IdOverflow)?;
        let transaction = transaction.with_id(id);

        self.next_id = id.checked_add(1);
        self.transactions.push(transaction.clone());

        Ok(transaction)
    }

    /// Remove the transaction with `id`.
    ///
    /// Returns `None` if no transaction has that ID.
    pub fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        self.take(id).map(|(_, transaction)| transaction)
    }

    fn take(&mut self, id: TransactionId) -> Option<(usize, Transaction)> {
        let index = self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)?;

        Some((index, self.transactions.remove(index)))
    }

    fn pop(&mut self) -> Option<Transaction> {
        self.transactions.pop()
    }

    fn restore(&mut self, index: usize, transaction: Transaction) {
        self.transactions.insert(index, transaction);
    }

    /// All transactions, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The distinct categories across the whole ledger in the order they first appear.
    pub fn categories(&self) -> Vec<&Category> {
        let mut seen = HashSet::new();

        self.transactions
            .iter()
            .map(|transaction| &transaction.category)
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// The number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the ledger has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Why a stored ledger could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The stored text is not valid JSON.
    InvalidJson(String),
    /// The stored text is JSON, but not an array of valid transactions.
    SchemaMismatch(String),
    /// Two stored transactions share an ID.
    DuplicateId(TransactionId),
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::InvalidJson(error) => write!(f, "invalid JSON: {error}"),
            MalformedReason::SchemaMismatch(error) => write!(f, "schema mismatch: {error}"),
            MalformedReason::DuplicateId(id) => write!(f, "duplicate transaction ID {id}"),
        }
    }
}

/// A stored ledger that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLedger {
    /// The stored text, unchanged.
    pub raw: String,
    /// What is wrong with it.
    pub reason: MalformedReason,
}

/// The result of reading the stored ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing has been stored yet.
    Missing,
    /// The stored ledger was read successfully.
    Loaded(Ledger),
    /// Something is stored but it is not a valid ledger.
    Malformed(MalformedLedger),
}

/// Read the ledger stored in the key-value table.
///
/// # Errors
/// Only SQL errors are returned as errors, a malformed ledger is reported as
/// [LoadOutcome::Malformed].
pub fn load_ledger(connection: &Connection) -> Result<LoadOutcome, Error> {
    let Some(raw) = get_value(LEDGER_KEY, connection)? else {
        return Ok(LoadOutcome::Missing);
    };

    let transactions = match serde_json::from_str::<Vec<Transaction>>(&raw) {
        Ok(transactions) => transactions,
        Err(error) => {
            let reason = if error.is_data() {
                MalformedReason::SchemaMismatch(error.to_string())
            } else {
                MalformedReason::InvalidJson(error.to_string())
            };

            return Ok(LoadOutcome::Malformed(MalformedLedger { raw, reason }));
        }
    };

    match Ledger::from_transactions(transactions) {
        Ok(ledger) => Ok(LoadOutcome::Loaded(ledger)),
        Err(id) => Ok(LoadOutcome::Malformed(MalformedLedger {
            raw,
            reason: MalformedReason::DuplicateId(id),
        })),
    }
}

/// Owns the ledger and writes it back to the database after every change.
#[derive(Debug)]
pub struct LedgerStore {
    ledger: Ledger,
    connection: Connection,
}

impl LedgerStore {
    /// Load the stored ledger, starting with an empty ledger if none is stored
    /// or the stored ledger is malformed.
    ///
    /// A malformed ledger is copied to [MALFORMED_LEDGER_KEY] so that it is
    /// not lost when the ledger is next saved.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be read or the
    /// malformed ledger cannot be backed up.
    pub fn load(connection: Connection) -> Result<Self, Error> {
        let ledger = match load_ledger(&connection)? {
            LoadOutcome::Loaded(ledger) => {
                tracing::info!("Loaded {} transaction(s)", ledger.len());
                ledger
            }
            LoadOutcome::Missing => {
                tracing::info!("No stored ledger, starting with an empty ledger");
                Ledger::new()
            }
            LoadOutcome::Malformed(malformed) => {
                tracing::warn!(
                    "Stored ledger is malformed ({}), starting with an empty ledger. \
                    The stored ledger has been copied to \"{MALFORMED_LEDGER_KEY}\".",
                    malformed.reason
                );
                set_value(MALFORMED_LEDGER_KEY, &malformed.raw, &connection)?;
                Ledger::new()
            }
        };

        Ok(Self { ledger, connection })
    }

    /// The current ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Append a transaction and save the ledger.
    ///
    /// The ledger is left unchanged if it could not be saved.
    ///
    /// # Errors
    /// Returns an [Error::IdOverflow] if no ID is left, or an error from [LedgerStore::persist].
    pub fn add(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let transaction = self.ledger.push(transaction)?;

        if let Err(error) = self.persist() {
            self.ledger.pop();
            return Err(error);
        }

        Ok(transaction)
    }

    /// Remove the transaction with `id` and save the ledger.
    ///
    /// Returns `Ok(None)` without saving if no transaction has that ID.
    /// The ledger is left unchanged if it could not be saved.
    ///
    /// # Errors
    /// Returns an error from [LedgerStore::persist].
    pub fn remove(&mut self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        let Some((index, transaction)) = self.ledger.take(id) else {
            return Ok(None);
        };

        if let Err(error) = self.persist() {
            self.ledger.restore(index, transaction);
            return Err(error);
        }

        Ok(Some(transaction))
    }

    /// Write the whole ledger to the database as a JSON array.
    ///
    /// # Errors
    /// Returns an [Error::JSONSerializationError] if the ledger cannot be
    /// serialized or an [Error::SqlError] if it cannot be written.
    pub fn persist(&self) -> Result<(), Error> {
        let json = serde_json::to_string(self.ledger.transactions())
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        set_value(LEDGER_KEY, &json, &self.connection)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        key_value::{get_value, set_value},
        transaction::{
            Amount, Category, MAX_AMOUNT, NewTransaction, TransactionName, TransactionType,
            test_utils::new_transaction,
        },
    };

    use super::{
        LEDGER_KEY, Ledger, LedgerStore, LoadOutcome, MALFORMED_LEDGER_KEY, MalformedReason,
        load_ledger,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn get_test_store() -> LedgerStore {
        LedgerStore::load(get_test_connection()).unwrap()
    }

    #[test]
    fn missing_ledger_loads_empty() {
        let connection = get_test_connection();

        assert_eq!(load_ledger(&connection), Ok(LoadOutcome::Missing));

        let store = LedgerStore::load(connection).unwrap();
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn add_appends_with_exact_fields_and_persists() {
        let mut store = get_test_store();
        let input = NewTransaction {
            name: TransactionName::new("Coffee").unwrap(),
            amount: Amount::new(dec!(5)).unwrap(),
            transaction_type: TransactionType::Expense,
            date: date!(2024 - 01 - 10),
            category: Category::new("Food").unwrap(),
        };

        let transaction = store.add(input.clone()).unwrap();

        assert_eq!(store.ledger().len(), 1);
        assert_eq!(transaction.name, input.name);
        assert_eq!(transaction.amount, input.amount);
        assert_eq!(transaction.transaction_type, input.transaction_type);
        assert_eq!(transaction.date, input.date);
        assert_eq!(transaction.category, input.category);

        let LoadOutcome::Loaded(stored) = load_ledger(store.connection()).unwrap() else {
            panic!("want ledger to be stored after add");
        };
        assert_eq!(stored.transactions(), store.ledger().transactions());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = get_test_store();

        let ids = (0..5)
            .map(|i| {
                store
                    .add(new_transaction(&format!("T{i}"), 1, "income", "2024-01-01", "A"))
                    .unwrap()
                    .id
            })
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn remove_deletes_only_the_matching_transaction() {
        let mut store = get_test_store();
        let coffee = store
            .add(new_transaction("Coffee", 5, "expense", "2024-01-10", "Food"))
            .unwrap();
        let salary = store
            .add(new_transaction("Salary", 1000, "income", "2024-01-31", "Work"))
            .unwrap();

        let removed = store.remove(coffee.id).unwrap();

        assert_eq!(removed, Some(coffee));
        assert_eq!(store.ledger().transactions(), &[salary]);
        let LoadOutcome::Loaded(stored) = load_ledger(store.connection()).unwrap() else {
            panic!("want ledger to be stored after remove");
        };
        assert_eq!(stored.transactions(), store.ledger().transactions());
    }

    #[test]
    fn failed_add_leaves_ledger_unchanged() {
        let mut store = get_test_store();
        store
            .add(new_transaction("Coffee", 5, "expense", "2024-01-10", "Food"))
            .unwrap();
        let before = store.ledger().transactions().to_vec();
        store
            .connection()
            .execute("DROP TABLE key_value", ())
            .unwrap();

        let result = store.add(new_transaction("Salary", 1000, "income", "2024-01-31", "Work"));

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error, got {result:?}"
        );
        assert_eq!(store.ledger().len(), 1);
        assert_eq!(store.ledger().transactions(), before);
    }

    #[test]
    fn failed_remove_restores_transaction_in_place() {
        let mut store = get_test_store();
        for name in ["Coffee", "Salary", "Rent"] {
            store
                .add(new_transaction(name, 5, "expense", "2024-01-10", "Food"))
                .unwrap();
        }
        let before = store.ledger().transactions().to_vec();
        store
            .connection()
            .execute("DROP TABLE key_value", ())
            .unwrap();

        let result = store.remove(2);

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error, got {result:?}"
        );
        assert_eq!(store.ledger().transactions(), before);
        let ids = store
            .ledger()
            .transactions()
            .iter()
            .map(|transaction| transaction.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn stored_amounts_match_memory() {
        let mut store = get_test_store();
        for amount in [dec!(0.01), dec!(12.34), dec!(4.5), MAX_AMOUNT] {
            store
                .add(NewTransaction {
                    amount: Amount::new(amount).unwrap(),
                    ..new_transaction("Coffee", 1, "expense", "2024-01-10", "Food")
                })
                .unwrap();
        }

        let LoadOutcome::Loaded(stored) = load_ledger(store.connection()).unwrap() else {
            panic!("want the stored ledger to load");
        };
        assert_eq!(stored.transactions(), store.ledger().transactions());
    }

    #[test]
    fn remove_missing_id_is_a_no_op() {
        let mut store = get_test_store();
        store
            .add(new_transaction("Coffee", 5, "expense", "2024-01-10", "Food"))
            .unwrap();
        let before = store.ledger().clone();

        assert_eq!(store.remove(42), Ok(None));
        assert_eq!(store.ledger(), &before);
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut store = get_test_store();
        store
            .add(new_transaction("A", 1, "income", "2024-01-01", "A"))
            .unwrap();
        let second = store
            .add(new_transaction("B", 1, "income", "2024-01-01", "A"))
            .unwrap();
        store.remove(second.id).unwrap();

        let third = store
            .add(new_transaction("C", 1, "income", "2024-01-01", "A"))
            .unwrap();

        assert_eq!(third.id, 3);
    }

    #[test]
    fn new_ids_continue_after_stored_timestamp_ids() {
        let connection = get_test_connection();
        set_value(
            LEDGER_KEY,
            r#"[{"id":1704844800000,"name":"Salary","amount":1000,"type":"income","date":"2024-01-31","category":"Work"}]"#,
            &connection,
        )
        .unwrap();
        let mut store = LedgerStore::load(connection).unwrap();

        let transaction = store
            .add(new_transaction("Coffee", 5, "expense", "2024-02-01", "Food"))
            .unwrap();

        assert_eq!(transaction.id, 1704844800001);
    }

    #[test]
    fn invalid_json_is_malformed_and_backed_up() {
        let connection = get_test_connection();
        set_value(LEDGER_KEY, "[{not json", &connection).unwrap();

        let outcome = load_ledger(&connection).unwrap();
        assert!(
            matches!(
                outcome,
                LoadOutcome::Malformed(ref malformed)
                    if matches!(malformed.reason, MalformedReason::InvalidJson(_))
            ),
            "want invalid JSON, got {outcome:?}"
        );

        let store = LedgerStore::load(connection).unwrap();
        assert!(store.ledger().is_empty());
        assert_eq!(
            get_value(MALFORMED_LEDGER_KEY, store.connection()),
            Ok(Some("[{not json".to_owned()))
        );
    }

    #[test]
    fn invalid_records_are_a_schema_mismatch() {
        let cases = [
            r#"{"transactions": []}"#,
            r#"[{"id":1,"name":"A","amount":-3,"type":"expense","date":"2024-01-01","category":"A"}]"#,
            r#"[{"id":1,"name":"A","type":"expense","date":"2024-01-01","category":"A"}]"#,
        ];

        for raw in cases {
            let connection = get_test_connection();
            set_value(LEDGER_KEY, raw, &connection).unwrap();

            let outcome = load_ledger(&connection).unwrap();

            assert!(
                matches!(
                    outcome,
                    LoadOutcome::Malformed(ref malformed)
                        if matches!(malformed.reason, MalformedReason::SchemaMismatch(_))
                ),
                "want schema mismatch for {raw}, got {outcome:?}"
            );
        }
    }

    #[test]
    fn duplicate_ids_are_malformed() {
        let connection = get_test_connection();
        set_value(
            LEDGER_KEY,
            r#"[{"id":7,"name":"A","amount":1,"type":"income","date":"2024-01-01","category":"A"},
                {"id":7,"name":"B","amount":2,"type":"income","date":"2024-01-02","category":"A"}]"#,
            &connection,
        )
        .unwrap();

        let outcome = load_ledger(&connection).unwrap();

        assert!(
            matches!(
                outcome,
                LoadOutcome::Malformed(ref malformed)
                    if malformed.reason == MalformedReason::DuplicateId(7)
            ),
            "want duplicate ID, got {outcome:?}"
        );
    }

    #[test]
    fn next_save_overwrites_malformed_ledger() {
        let connection = get_test_connection();
        set_value(LEDGER_KEY, "oops", &connection).unwrap();
        let mut store = LedgerStore::load(connection).unwrap();

        store
            .add(new_transaction("Coffee", 5, "expense", "2024-01-10", "Food"))
            .unwrap();

        assert!(matches!(
            load_ledger(store.connection()),
            Ok(LoadOutcome::Loaded(ref ledger)) if ledger.len() == 1
        ));
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        let mut ledger = Ledger::new();
        for (name, category) in [("A", "Food"), ("B", "Work"), ("C", "Food"), ("D", "food")] {
            ledger
                .push(new_transaction(name, 1, "expense", "2024-01-01", category))
                .unwrap();
        }

        let categories = ledger
            .categories()
            .into_iter()
            .map(|category| category.as_ref())
            .collect::<Vec<_>>();

        assert_eq!(categories, vec!["Food", "Work", "food"]);
    }
}
