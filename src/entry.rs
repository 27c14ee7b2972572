use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::account::AccountNumber;
use crate::transaction::{Transaction, TransactionKind};

/// One row of a batch script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OperationEntry {
    #[serde(rename = "type")]
    pub entry_type: OperationEntryType,
    pub tax_id: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub account: Option<AccountNumber>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationEntryType {
    Client,
    Account,
    Deposit,
    Withdrawal,
}

impl TryFrom<OperationEntryType> for TransactionKind {
    type Error = ConversionError;

    fn try_from(value: OperationEntryType) -> Result<Self, Self::Error> {
        match value {
            OperationEntryType::Deposit => Ok(TransactionKind::Deposit),
            OperationEntryType::Withdrawal => Ok(TransactionKind::Withdrawal),
            _ => Err(ConversionError::InvalidTransactionType),
        }
    }
}

impl TryFrom<&OperationEntry> for Transaction {
    type Error = ConversionError;

    fn try_from(value: &OperationEntry) -> Result<Self, Self::Error> {
        Ok(Transaction::new(
            value.entry_type.try_into()?,
            value.amount.ok_or(ConversionError::MissingAmount)?,
        ))
    }
}

impl OperationEntry {
    pub fn require<'a>(
        field: &'a Option<String>,
        name: &'static str,
    ) -> Result<&'a str, ConversionError> {
        field
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or(ConversionError::MissingField(name))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid transaction type for conversion")]
    InvalidTransactionType,
    #[error("Missing amount for transaction")]
    MissingAmount,
    #[error("Missing account number for transaction")]
    MissingAccount,
    #[error("Missing {0}")]
    MissingField(&'static str),
}
