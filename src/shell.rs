//! Interactive text menu on top of [`Bank`].
//!
//! Input problems (bad numbers, dates or tax ids) are reported and the menu
//! carries on. End of input behaves like `q`.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountNumber;
use crate::bank::Bank;
use crate::client::{Client, TaxId, parse_birth_date};
use crate::clock::{Clock, SystemClock};
use crate::transaction::{Transaction, TransactionKind};

const MENU: &str = "
================ MENU ================
[d]  Deposit
[w]  Withdraw
[s]  Statement
[na] New account
[la] List accounts
[nc] New client
[lc] List clients
[q]  Quit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuCommand {
    Deposit,
    Withdraw,
    Statement,
    NewAccount,
    ListAccounts,
    NewClient,
    ListClients,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid option {0:?}, please choose again.")]
struct UnknownCommand(String);

impl FromStr for MenuCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" => Ok(MenuCommand::Deposit),
            "w" => Ok(MenuCommand::Withdraw),
            "s" => Ok(MenuCommand::Statement),
            "na" => Ok(MenuCommand::NewAccount),
            "la" => Ok(MenuCommand::ListAccounts),
            "nc" => Ok(MenuCommand::NewClient),
            "lc" => Ok(MenuCommand::ListClients),
            "q" => Ok(MenuCommand::Quit),
            _ => Err(UnknownCommand(s.trim().to_string())),
        }
    }
}

pub struct Shell<R, W, C: Clock = SystemClock> {
    bank: Bank<C>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write, C: Clock> Shell<R, W, C> {
    pub fn new(bank: Bank<C>, input: R, output: W) -> Self {
        Shell {
            bank,
            input,
            output,
        }
    }

    pub fn bank(&self) -> &Bank<C> {
        &self.bank
    }

    pub fn into_bank(self) -> Bank<C> {
        self.bank
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("=> ")? else {
                break;
            };

            match choice.parse::<MenuCommand>() {
                Ok(MenuCommand::Deposit) => self.transact(TransactionKind::Deposit)?,
                Ok(MenuCommand::Withdraw) => self.transact(TransactionKind::Withdrawal)?,
                Ok(MenuCommand::Statement) => self.statement()?,
                Ok(MenuCommand::NewAccount) => self.new_account()?,
                Ok(MenuCommand::ListAccounts) => self.list_accounts()?,
                Ok(MenuCommand::NewClient) => self.new_client()?,
                Ok(MenuCommand::ListClients) => self.list_clients()?,
                Ok(MenuCommand::Quit) => break,
                Err(e) => self.fail(e)?,
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()
    }

    /// `None` once the input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn fail(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "\n!!! {message} !!!")
    }

    fn done(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "\n=== {message} ===")
    }

    fn read_tax_id(&mut self) -> io::Result<Option<TaxId>> {
        let Some(raw) = self.prompt("Client tax id (digits only): ")? else {
            return Ok(None);
        };
        match TaxId::parse(&raw) {
            Ok(tax_id) => Ok(Some(tax_id)),
            Err(e) => self.fail(e).map(|()| None),
        }
    }

    /// Asks for a client and one of that client's account numbers.
    fn select_account(&mut self) -> io::Result<Option<(TaxId, AccountNumber)>> {
        let Some(tax_id) = self.read_tax_id()? else {
            return Ok(None);
        };
        let Some(client) = self.bank.find_client(&tax_id) else {
            self.fail("Client not found")?;
            return Ok(None);
        };
        if client.accounts().is_empty() {
            self.fail("Client has no accounts")?;
            return Ok(None);
        }

        let held = client
            .accounts()
            .iter()
            .map(|number| number.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let Some(raw) = self.prompt(&format!("Account number [{held}]: "))? else {
            return Ok(None);
        };
        match raw.parse::<AccountNumber>() {
            Ok(number) => Ok(Some((tax_id, number))),
            Err(_) => self.fail(format!("Invalid account number: {raw:?}")).map(|()| None),
        }
    }

    fn transact(&mut self, kind: TransactionKind) -> io::Result<()> {
        let Some((tax_id, number)) = self.select_account()? else {
            return Ok(());
        };
        let label = match kind {
            TransactionKind::Deposit => "Deposit amount: ",
            TransactionKind::Withdrawal => "Withdrawal amount: ",
        };
        let Some(raw) = self.prompt(label)? else {
            return Ok(());
        };
        let Ok(amount) = Decimal::from_str(&raw) else {
            return self.fail(format!("Invalid amount: {raw:?}"));
        };

        match self.bank.apply(&tax_id, number, Transaction::new(kind, amount)) {
            Ok(()) => self.done(format!("{kind} of $ {amount:.2} completed")),
            Err(e) => self.fail(format!("Operation failed: {e}")),
        }
    }

    fn statement(&mut self) -> io::Result<()> {
        let Some((tax_id, number)) = self.select_account()? else {
            return Ok(());
        };
        match self.bank.statement(&tax_id, number) {
            Ok(statement) => writeln!(self.output, "\n{statement}"),
            Err(e) => self.fail(e),
        }
    }

    fn new_client(&mut self) -> io::Result<()> {
        let Some(tax_id) = self.read_tax_id()? else {
            return Ok(());
        };
        if self.bank.find_client(&tax_id).is_some() {
            return self.fail(format!("A client with tax id {tax_id} already exists"));
        }

        let Some(name) = self.prompt("Full name: ")? else {
            return Ok(());
        };
        if name.is_empty() {
            return self.fail("Name must not be empty");
        }
        let Some(raw_birth_date) = self.prompt("Birth date (dd-mm-yyyy): ")? else {
            return Ok(());
        };
        let birth_date = match parse_birth_date(&raw_birth_date) {
            Ok(date) => date,
            Err(e) => return self.fail(e),
        };
        let Some(address) = self.prompt("Address (street, number - district - city/state): ")?
        else {
            return Ok(());
        };

        match self
            .bank
            .register_client(Client::person(name, birth_date, tax_id, address))
        {
            Ok(client) => {
                let message = format!("Client {} registered", client.name());
                self.done(message)
            }
            Err(e) => self.fail(e),
        }
    }

    fn new_account(&mut self) -> io::Result<()> {
        let Some(tax_id) = self.read_tax_id()? else {
            return Ok(());
        };
        match self.bank.open_account(&tax_id) {
            Ok(number) => {
                let message = format!(
                    "Account {number} opened at branch {}",
                    self.bank.defaults().branch
                );
                self.done(message)
            }
            Err(e) => self.fail(e),
        }
    }

    fn list_accounts(&mut self) -> io::Result<()> {
        if self.bank.accounts().next().is_none() {
            return self.fail("No accounts registered");
        }

        for account in self.bank.accounts() {
            let holder = self
                .bank
                .find_client(account.owner())
                .map_or("-", Client::name);
            writeln!(
                self.output,
                "{}\nBranch:\t\t{}\nAccount:\t{}\nHolder:\t\t{}\nBalance:\t$ {:.2}",
                "=".repeat(38),
                account.branch(),
                account.number(),
                holder,
                account.balance()
            )?;
        }
        Ok(())
    }

    fn list_clients(&mut self) -> io::Result<()> {
        if self.bank.clients().is_empty() {
            return self.fail("No clients registered");
        }

        for client in self.bank.clients() {
            writeln!(
                self.output,
                "{}\nName:\t\t{}\nTax id:\t\t{}\nBorn:\t\t{}\nAddress:\t{}\nAccounts:\t{}",
                "=".repeat(38),
                client.name(),
                client.tax_id(),
                client.birth_date().format("%d-%m-%Y"),
                client.address(),
                client.accounts().len()
            )?;
        }
        Ok(())
    }
}
