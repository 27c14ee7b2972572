use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use crate::account::Account;
use crate::clock::Clock;
use crate::error::LedgerError;
use crate::history::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
        })
    }
}

/// A requested deposit or withdrawal, not yet applied to any account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Decimal,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: Decimal) -> Self {
        Transaction { kind, amount }
    }

    pub fn deposit(amount: Decimal) -> Self {
        Self::new(TransactionKind::Deposit, amount)
    }

    pub fn withdrawal(amount: Decimal) -> Self {
        Self::new(TransactionKind::Withdrawal, amount)
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Applies the transaction to `account` and, only if the account accepts
    /// it, appends it to the account's log stamped with the clock reading
    /// used for the limit check.
    pub fn register_on(&self, account: &mut Account, clock: &dyn Clock) -> Result<(), LedgerError> {
        let now = clock.now();

        let result = match self.kind {
            TransactionKind::Deposit => account.deposit(self.amount),
            TransactionKind::Withdrawal => account.withdraw(self.amount, &now),
        };

        match result {
            Ok(()) => {
                account.log_mut().append(LogEntry {
                    kind: self.kind,
                    amount: self.amount,
                    timestamp: now,
                });
                debug!(
                    account = account.number(),
                    kind = %self.kind,
                    amount = %self.amount,
                    balance = %account.balance(),
                    "transaction applied"
                );
                Ok(())
            }
            Err(error) => {
                debug!(
                    account = account.number(),
                    kind = %self.kind,
                    amount = %self.amount,
                    %error,
                    "transaction rejected"
                );
                Err(error)
            }
        }
    }
}
