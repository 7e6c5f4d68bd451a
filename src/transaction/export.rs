//! Writing the whole ledger as CSV.

use csv::{Terminator, WriterBuilder};

use crate::Error;

use super::{core::format_date, ledger::Ledger};

/// The first row of every export.
pub const CSV_HEADER: [&str; 5] = ["Name", "Amount", "Type", "Date", "Category"];

/// Write every transaction in `ledger` as CSV, in ledger order.
///
/// Fields that contain commas, quotes or line breaks are quoted.
///
/// # Errors
/// Returns an [Error::EmptyLedgerExport] if the ledger has no transactions,
/// or an [Error::CsvError] if a record could not be written.
pub fn export_csv(ledger: &Ledger) -> Result<Vec<u8>, Error> {
    if ledger.is_empty() {
        return Err(Error::EmptyLedgerExport);
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for transaction in ledger.transactions() {
        let amount = transaction.amount.to_string();
        let date = format_date(transaction.date);

        writer.write_record([
            transaction.name.as_ref(),
            amount.as_str(),
            transaction.transaction_type.as_str(),
            date.as_str(),
            transaction.category.as_ref(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}
