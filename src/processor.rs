use std::io::Read;
use std::iter::Iterator;

use csv::{ReaderBuilder, Trim};
use tracing::warn;

use crate::bank::Bank;
use crate::client::{Client, TaxId, parse_birth_date};
use crate::clock::Clock;
use crate::entry::{ConversionError, OperationEntry, OperationEntryType};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Replays a CSV batch script against `bank`. Malformed and rejected rows
/// are logged and skipped.
#[inline]
pub fn process_csv_stream<C: Clock>(bank: &mut Bank<C>, reader: impl Read) {
    let mut binding = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let stream = binding
        .deserialize()
        .inspect(|result: &Result<OperationEntry, csv::Error>| {
            if let Err(e) = result {
                warn!(error = %e, "skipping unparsable row");
            }
        })
        .filter_map(Result::ok);

    process_stream(bank, stream);
}

#[inline]
pub fn process_stream<C: Clock>(bank: &mut Bank<C>, stream: impl Iterator<Item = OperationEntry>) {
    for entry in stream {
        let entry_type = entry.entry_type;
        let result = process_entry(bank, entry);

        result.unwrap_or_else(|e| {
            warn!(?entry_type, error = %e, "skipping rejected row");
        });
    }
}

#[inline]
fn process_entry<C: Clock>(bank: &mut Bank<C>, entry: OperationEntry) -> Result<(), LedgerError> {
    let tax_id = TaxId::parse(&entry.tax_id)?;

    match entry.entry_type {
        OperationEntryType::Client => {
            let name = OperationEntry::require(&entry.name, "name")?;
            let raw_birth_date = OperationEntry::require(&entry.birth_date, "birth date")?;
            let birth_date = parse_birth_date(raw_birth_date)?;
            let address = OperationEntry::require(&entry.address, "address")?;
            bank.register_client(Client::person(name, birth_date, tax_id, address))?;
        }
        OperationEntryType::Account => {
            bank.open_account(&tax_id)?;
        }
        OperationEntryType::Deposit | OperationEntryType::Withdrawal => {
            let number = entry.account.ok_or(ConversionError::MissingAccount)?;
            bank.apply(&tax_id, number, Transaction::try_from(&entry)?)?;
        }
    }
    Ok(())
}
