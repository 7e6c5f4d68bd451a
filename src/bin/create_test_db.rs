use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use budget_ledger::{
    Amount, Category, LedgerStore, NewTransaction, TransactionName, TransactionType,
    TransactionType::{Expense, Income},
    initialize_db,
};
use time::{Date, macros::date};

/// A utility for creating a test database for the budget_ledger server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let mut store = LedgerStore::load(conn)?;

    println!("Creating demo transactions...");

    let demo_transactions = [
        ("Salary", "1000", Income, date!(2024 - 01 - 01), "Work"),
        ("Rent", "450", Expense, date!(2024 - 01 - 02), "Housing"),
        ("Coffee", "4.50", Expense, date!(2024 - 01 - 10), "Food"),
        ("Groceries", "82.35", Expense, date!(2024 - 01 - 14), "Food"),
        ("Dinner, with friends", "36", Expense, date!(2024 - 01 - 20), "Eating out & bars"),
        ("Salary", "1000", Income, date!(2024 - 02 - 01), "Work"),
        ("Rent", "450", Expense, date!(2024 - 02 - 02), "Housing"),
        (
            "Monthly subscription to the streaming service",
            "12.99",
            Expense,
            date!(2024 - 02 - 05),
            "Entertainment",
        ),
        ("Freelance work", "250", Income, date!(2024 - 02 - 18), "Work"),
        ("Coffee", "4.50", Expense, date!(2024 - 03 - 03), "Food"),
    ];

    for (name, amount, transaction_type, date, category) in demo_transactions {
        store.add(demo_transaction(name, amount, transaction_type, date, category)?)?;
    }

    println!("Created {} transactions.", store.ledger().len());
    println!("Success!");

    Ok(())
}

fn demo_transaction(
    name: &str,
    amount: &str,
    transaction_type: TransactionType,
    date: Date,
    category: &str,
) -> Result<NewTransaction, budget_ledger::Error> {
    Ok(NewTransaction {
        name: TransactionName::new(name)?,
        amount: Amount::parse(amount)?,
        transaction_type,
        date,
        category: Category::new(category)?,
    })
}
