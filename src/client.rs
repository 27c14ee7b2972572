use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::account::{Account, AccountNumber};
use crate::clock::Clock;
use crate::error::LedgerError;
use crate::transaction::Transaction;

const BIRTH_DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%Y-%m-%d"];

/// Taxpayer number, kept as bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxId(String);

impl TaxId {
    /// Accepts punctuated forms such as `123.456.789-00`.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let digits: String = raw
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | '/') && !c.is_whitespace())
            .collect();

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(LedgerError::InvalidTaxId(raw.to_string()));
        }
        Ok(TaxId(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaxId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    let raw = raw.trim();
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| LedgerError::InvalidBirthDate(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub birth_date: NaiveDate,
    pub tax_id: TaxId,
}

/// An account holder. Identity is fixed at construction; only the list of
/// held account numbers grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    person: Person,
    address: String,
    accounts: Vec<AccountNumber>,
}

impl Client {
    pub fn person(
        name: impl Into<String>,
        birth_date: NaiveDate,
        tax_id: TaxId,
        address: impl Into<String>,
    ) -> Self {
        Client {
            person: Person {
                name: name.into(),
                birth_date,
                tax_id,
            },
            address: address.into(),
            accounts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.person.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.person.birth_date
    }

    pub fn tax_id(&self) -> &TaxId {
        &self.person.tax_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn accounts(&self) -> &[AccountNumber] {
        &self.accounts
    }

    pub fn holds(&self, number: AccountNumber) -> bool {
        self.accounts.contains(&number)
    }

    pub fn add_account(&mut self, number: AccountNumber) {
        self.accounts.push(number);
    }

    pub fn apply_transaction(
        &self,
        account: &mut Account,
        transaction: &Transaction,
        clock: &dyn Clock,
    ) -> Result<(), LedgerError> {
        transaction.register_on(account, clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::new_account;
    use crate::clock::{FixedClock, at};
    use rust_decimal::dec;

    fn ana() -> Client {
        Client::person(
            "Ana Souza",
            NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            TaxId::parse("123.456.789-00").unwrap(),
            "Rua A, 10 - Centro - Recife/PE",
        )
    }

    #[test]
    fn test_tax_id_parse() {
        assert_eq!(TaxId::parse("123.456.789-00").unwrap().as_str(), "12345678900");
        assert_eq!(TaxId::parse(" 987 654 ").unwrap().as_str(), "987654");
        assert_eq!("42".parse::<TaxId>().unwrap().to_string(), "42");

        assert_eq!(
            TaxId::parse(""),
            Err(LedgerError::InvalidTaxId(String::new()))
        );
        assert_eq!(
            TaxId::parse("12a45"),
            Err(LedgerError::InvalidTaxId("12a45".to_string()))
        );
        assert!(TaxId::parse("--").is_err());
    }

    #[test]
    fn test_parse_birth_date() {
        let expected = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
        assert_eq!(parse_birth_date("12-04-1990").unwrap(), expected);
        assert_eq!(parse_birth_date("1990-04-12").unwrap(), expected);
        assert_eq!(
            parse_birth_date("31-02-1990"),
            Err(LedgerError::InvalidBirthDate("31-02-1990".to_string()))
        );
    }

    #[test]
    fn test_client_identity() {
        let client = ana();
        assert_eq!(client.name(), "Ana Souza");
        assert_eq!(client.tax_id().as_str(), "12345678900");
        assert_eq!(client.birth_date(), NaiveDate::from_ymd_opt(1990, 4, 12).unwrap());
        assert_eq!(client.address(), "Rua A, 10 - Centro - Recife/PE");
        assert!(client.accounts().is_empty());
    }

    #[test]
    fn test_add_account_keeps_duplicates() {
        let mut client = ana();
        client.add_account(1);
        client.add_account(2);
        client.add_account(1);

        assert_eq!(client.accounts(), &[1, 2, 1]);
        assert!(client.holds(2));
        assert!(!client.holds(3));
    }

    #[test]
    fn test_apply_transaction() {
        let clock = FixedClock::new(at("2024-05-02T12:00:00Z"));
        let client = ana();
        let mut account = new_account(&client, 1);

        client
            .apply_transaction(&mut account, &Transaction::deposit(dec!(250)), &clock)
            .unwrap();
        client
            .apply_transaction(&mut account, &Transaction::withdrawal(dec!(100)), &clock)
            .unwrap();

        assert_eq!(account.balance(), dec!(150));
        assert_eq!(account.log().len(), 2);
    }
}
