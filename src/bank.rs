use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Display;

use tracing::info;

use crate::account::{Account, AccountNumber};
use crate::client::{Client, TaxId};
use crate::clock::{Clock, SystemClock};
use crate::config::AccountDefaults;
use crate::error::LedgerError;
use crate::statement::Statement;
use crate::transaction::Transaction;

pub type Accounts = BTreeMap<AccountNumber, Account>;

pub fn find_client_by_tax_id<'a>(tax_id: &TaxId, clients: &'a [Client]) -> Option<&'a Client> {
    clients.iter().find(|client| client.tax_id() == tax_id)
}

/// Looks `number` up among the accounts `client` holds; accounts of other
/// clients are treated as absent.
pub fn find_account_by_number<'a>(
    client: &Client,
    number: AccountNumber,
    accounts: &'a Accounts,
) -> Option<&'a Account> {
    if !client.holds(number) {
        return None;
    }
    accounts.get(&number)
}

/// In-memory registry of clients and accounts.
pub struct Bank<C: Clock = SystemClock> {
    clients: Vec<Client>,
    accounts: Accounts,
    defaults: AccountDefaults,
    clock: C,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(AccountDefaults::default())
    }
}

impl Bank {
    pub fn new(defaults: AccountDefaults) -> Self {
        Self::with_clock(defaults, SystemClock)
    }
}

impl<C: Clock> Bank<C> {
    pub fn with_clock(defaults: AccountDefaults, clock: C) -> Self {
        Bank {
            clients: Vec::new(),
            accounts: Accounts::new(),
            defaults,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn defaults(&self) -> &AccountDefaults {
        &self.defaults
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn account(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts.get(&number)
    }

    pub fn find_client(&self, tax_id: &TaxId) -> Option<&Client> {
        find_client_by_tax_id(tax_id, &self.clients)
    }

    #[inline]
    fn client_index(&self, tax_id: &TaxId) -> Result<usize, LedgerError> {
        self.clients
            .iter()
            .position(|client| client.tax_id() == tax_id)
            .ok_or_else(|| LedgerError::ClientNotFound(tax_id.clone()))
    }

    #[inline]
    fn next_account_number(&self) -> AccountNumber {
        self.accounts
            .keys()
            .next_back()
            .map_or(1, |number| number + 1)
    }

    pub fn register_client(&mut self, client: Client) -> Result<&Client, LedgerError> {
        if self.find_client(client.tax_id()).is_some() {
            return Err(LedgerError::DuplicateTaxId(client.tax_id().clone()));
        }

        let tax_id = client.tax_id().clone();
        info!(%tax_id, name = client.name(), "client registered");
        self.clients.push(client);
        self.clients
            .last()
            .ok_or(LedgerError::ClientNotFound(tax_id))
    }

    /// Opens a checking account for the client with the configured branch and
    /// limits, numbered after the highest existing account.
    pub fn open_account(&mut self, tax_id: &TaxId) -> Result<AccountNumber, LedgerError> {
        let index = self.client_index(tax_id)?;
        let number = self.next_account_number();

        let account = Account::checking(
            number,
            self.defaults.branch.clone(),
            tax_id.clone(),
            self.defaults.limits(),
        );
        self.accounts.insert(number, account);
        self.clients[index].add_account(number);

        info!(%tax_id, account = number, branch = %self.defaults.branch, "account opened");
        Ok(number)
    }

    pub fn find_account(
        &self,
        tax_id: &TaxId,
        number: AccountNumber,
    ) -> Result<&Account, LedgerError> {
        let client = self
            .find_client(tax_id)
            .ok_or_else(|| LedgerError::ClientNotFound(tax_id.clone()))?;
        if client.accounts().is_empty() {
            return Err(LedgerError::NoAccounts(tax_id.clone()));
        }
        find_account_by_number(client, number, &self.accounts)
            .ok_or(LedgerError::AccountNotFound(number))
    }

    /// Runs `transaction` through the client against one of the client's own
    /// accounts.
    pub fn apply(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        transaction: Transaction,
    ) -> Result<(), LedgerError> {
        let client = find_client_by_tax_id(tax_id, &self.clients)
            .ok_or_else(|| LedgerError::ClientNotFound(tax_id.clone()))?;
        if client.accounts().is_empty() {
            return Err(LedgerError::NoAccounts(tax_id.clone()));
        }
        if !client.holds(number) {
            return Err(LedgerError::AccountNotFound(number));
        }
        let account = self
            .accounts
            .get_mut(&number)
            .ok_or(LedgerError::AccountNotFound(number))?;

        client.apply_transaction(account, &transaction, &self.clock)
    }

    pub fn statement(
        &self,
        tax_id: &TaxId,
        number: AccountNumber,
    ) -> Result<Statement<'_>, LedgerError> {
        self.find_account(tax_id, number).map(Statement::from)
    }
}

impl<C: Clock> Display for Bank<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "account, branch, holder, kind, balance")?;

        for account in self.accounts.values() {
            writeln!(
                f,
                "{}, {}, {}, {}, {:.2}",
                account.number(),
                account.branch(),
                account.owner(),
                account.kind(),
                account.balance()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, at};
    use chrono::{NaiveDate, TimeDelta};
    use rust_decimal::Decimal;
    use rust_decimal::dec;

    fn tax_id(raw: &str) -> TaxId {
        TaxId::parse(raw).unwrap()
    }

    fn person(name: &str, raw_tax_id: &str) -> Client {
        Client::person(
            name,
            NaiveDate::from_ymd_opt(1985, 1, 20).unwrap(),
            tax_id(raw_tax_id),
            "Av. B, 200",
        )
    }

    fn test_bank() -> Bank<FixedClock> {
        Bank::with_clock(
            AccountDefaults::default(),
            FixedClock::new(at("2024-05-02T09:00:00-03:00")),
        )
    }

    #[test]
    fn test_register_client_returns_stored_client() {
        let mut bank = test_bank();

        let client = bank.register_client(person("Ana", "111")).unwrap();
        assert_eq!(client.name(), "Ana");
        assert_eq!(client.tax_id(), &tax_id("111"));

        let client = bank.register_client(person("Bruno", "222")).unwrap();
        assert_eq!(client.name(), "Bruno");
        assert_eq!(bank.clients().len(), 2);
    }

    #[test]
    fn test_duplicate_tax_id_rejected() {
        let mut bank = test_bank();

        bank.register_client(person("Ana", "111")).unwrap();
        let result = bank.register_client(person("Bruno", "111"));

        assert_eq!(result, Err(LedgerError::DuplicateTaxId(tax_id("111"))));
        assert_eq!(bank.clients().len(), 1);
        assert_eq!(bank.find_client(&tax_id("111")).unwrap().name(), "Ana");
    }

    #[test]
    fn test_open_account_numbers_sequentially() {
        let mut bank = test_bank();
        bank.register_client(person("Ana", "111")).unwrap();
        bank.register_client(person("Bruno", "222")).unwrap();

        assert_eq!(bank.open_account(&tax_id("111")).unwrap(), 1);
        assert_eq!(bank.open_account(&tax_id("222")).unwrap(), 2);
        assert_eq!(bank.open_account(&tax_id("111")).unwrap(), 3);

        assert_eq!(bank.find_client(&tax_id("111")).unwrap().accounts(), &[1, 3]);
        assert_eq!(bank.account(2).unwrap().owner(), &tax_id("222"));
        assert_eq!(bank.account(2).unwrap().branch(), "0001");
        assert_eq!(bank.accounts().count(), 3);

        assert_eq!(
            bank.open_account(&tax_id("333")),
            Err(LedgerError::ClientNotFound(tax_id("333")))
        );
    }

    #[test]
    fn test_open_account_uses_configured_defaults() {
        let defaults = AccountDefaults {
            branch: "0042".to_string(),
            withdrawal_limit: dec!(100),
            daily_withdrawals: 1,
        };
        let mut bank = Bank::with_clock(defaults, FixedClock::new(at("2024-05-02T09:00:00Z")));
        bank.register_client(person("Ana", "111")).unwrap();
        let number = bank.open_account(&tax_id("111")).unwrap();

        bank.apply(&tax_id("111"), number, Transaction::deposit(dec!(1000)))
            .unwrap();
        assert!(matches!(
            bank.apply(&tax_id("111"), number, Transaction::withdrawal(dec!(150))),
            Err(LedgerError::ExceedsLimit { .. })
        ));
        bank.apply(&tax_id("111"), number, Transaction::withdrawal(dec!(50)))
            .unwrap();
        assert_eq!(
            bank.apply(&tax_id("111"), number, Transaction::withdrawal(dec!(50))),
            Err(LedgerError::DailyLimitExceeded { max: 1 })
        );
        assert_eq!(bank.account(number).unwrap().branch(), "0042");
        assert_eq!(bank.account(number).unwrap().balance(), dec!(950));
    }

    #[test]
    fn test_apply_requires_owned_account() {
        let mut bank = test_bank();
        bank.register_client(person("Ana", "111")).unwrap();
        bank.register_client(person("Bruno", "222")).unwrap();

        assert_eq!(
            bank.apply(&tax_id("111"), 1, Transaction::deposit(dec!(10))),
            Err(LedgerError::NoAccounts(tax_id("111")))
        );

        let anas = bank.open_account(&tax_id("111")).unwrap();
        let brunos = bank.open_account(&tax_id("222")).unwrap();

        assert_eq!(
            bank.apply(&tax_id("111"), brunos, Transaction::deposit(dec!(10))),
            Err(LedgerError::AccountNotFound(brunos))
        );
        assert_eq!(
            bank.apply(&tax_id("999"), anas, Transaction::deposit(dec!(10))),
            Err(LedgerError::ClientNotFound(tax_id("999")))
        );
        assert_eq!(bank.account(brunos).unwrap().balance(), Decimal::ZERO);
    }

    #[test]
    fn test_statement_scenario() {
        let mut bank = test_bank();
        bank.register_client(person("Ana", "111")).unwrap();
        let number = bank.open_account(&tax_id("111")).unwrap();
        let ana = tax_id("111");

        bank.apply(&ana, number, Transaction::deposit(dec!(1000))).unwrap();
        for _ in 0..3 {
            bank.clock().advance(TimeDelta::minutes(5));
            bank.apply(&ana, number, Transaction::withdrawal(dec!(200)))
                .unwrap();
        }
        assert_eq!(
            bank.apply(&ana, number, Transaction::withdrawal(dec!(200))),
            Err(LedgerError::DailyLimitExceeded { max: 3 })
        );
        assert_eq!(
            bank.apply(&ana, number, Transaction::withdrawal(dec!(600))),
            Err(LedgerError::InsufficientFunds {
                balance: dec!(400),
                requested: dec!(600),
            })
        );

        let statement = bank.statement(&ana, number).unwrap();
        assert_eq!(statement.account, number);
        assert_eq!(statement.entries.len(), 4);
        assert_eq!(statement.balance, dec!(400));

        bank.clock().advance(TimeDelta::days(1));
        bank.apply(&ana, number, Transaction::withdrawal(dec!(200)))
            .unwrap();
        assert_eq!(bank.account(number).unwrap().balance(), dec!(200));
    }

    #[test]
    fn test_find_account_by_number() {
        let mut bank = test_bank();
        bank.register_client(person("Ana", "111")).unwrap();
        bank.register_client(person("Bruno", "222")).unwrap();
        bank.open_account(&tax_id("111")).unwrap();
        bank.open_account(&tax_id("222")).unwrap();

        let ana = bank.find_client(&tax_id("111")).unwrap();
        assert!(find_account_by_number(ana, 1, &bank.accounts).is_some());
        assert!(find_account_by_number(ana, 2, &bank.accounts).is_none());
        assert!(find_account_by_number(ana, 9, &bank.accounts).is_none());

        assert_eq!(
            bank.find_account(&tax_id("111"), 2).unwrap_err(),
            LedgerError::AccountNotFound(2)
        );
        assert!(find_client_by_tax_id(&tax_id("333"), bank.clients()).is_none());
    }

    #[test]
    fn test_bank_display() {
        let mut bank = test_bank();
        bank.register_client(person("Ana", "111")).unwrap();
        bank.open_account(&tax_id("111")).unwrap();
        bank.apply(&tax_id("111"), 1, Transaction::deposit(dec!(12.5)))
            .unwrap();

        let output = format!("{}", bank);
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "account, branch, holder, kind, balance",
                "1, 0001, 111, checking, 12.50"
            ]
        );
    }

    #[test]
    fn test_bank_display_empty() {
        let bank: Bank = Bank::default();
        let output = format!("{}", bank);
        assert_eq!(output.trim(), "account, branch, holder, kind, balance");
    }
}
