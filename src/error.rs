use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountNumber;
use crate::client::TaxId;
use crate::entry::ConversionError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),
    #[error("Insufficient funds: balance {balance:.2}, requested {requested:.2}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },
    #[error("Amount {requested:.2} exceeds the per-withdrawal limit of {limit:.2}")]
    ExceedsLimit { requested: Decimal, limit: Decimal },
    #[error("Deposit of {amount:.2} would overflow the balance of {balance:.2}")]
    BalanceOverflow { balance: Decimal, amount: Decimal },
    #[error("Daily withdrawal limit exceeded: {max} withdrawals already made today")]
    DailyLimitExceeded { max: u32 },
    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),
    #[error("Client not found: {0}")]
    ClientNotFound(TaxId),
    #[error("A client with tax id {0} already exists")]
    DuplicateTaxId(TaxId),
    #[error("Client {0} has no accounts")]
    NoAccounts(TaxId),
    #[error("Invalid tax id: {0:?}")]
    InvalidTaxId(String),
    #[error("Invalid birth date: {0:?}")]
    InvalidBirthDate(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid entry: {0}")]
    InvalidEntry(ConversionError),
}

impl From<ConversionError> for LedgerError {
    fn from(error: ConversionError) -> Self {
        Self::InvalidEntry(error)
    }
}
