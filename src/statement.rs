use std::fmt;

use rust_decimal::Decimal;

use crate::account::{Account, AccountNumber};
use crate::history::LogEntry;

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'a> {
    pub account: AccountNumber,
    pub entries: &'a [LogEntry],
    pub balance: Decimal,
}

impl<'a> From<&'a Account> for Statement<'a> {
    fn from(account: &'a Account) -> Self {
        Statement {
            account: account.number(),
            entries: account.log().entries(),
            balance: account.balance(),
        }
    }
}

impl fmt::Display for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "================ STATEMENT {:>4} ================", self.account)?;
        if self.entries.is_empty() {
            writeln!(f, "No transactions recorded.")?;
        }
        for entry in self.entries {
            writeln!(
                f,
                "{}  {:<10} $ {:>12.2}",
                entry.timestamp.format(TIMESTAMP_FORMAT),
                entry.kind,
                entry.amount
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Balance: $ {:.2}", self.balance)?;
        write!(f, "=================================================")
    }
}
