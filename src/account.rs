use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::dec;

use crate::client::{Client, TaxId};
use crate::clock::Timestamp;
use crate::error::LedgerError;
use crate::history::TransactionLog;
use crate::transaction::TransactionKind;

pub type AccountNumber = u32;

pub const DEFAULT_BRANCH: &str = "0001";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckingLimits {
    pub withdrawal_limit: Decimal,
    pub daily_withdrawals: u32,
}

impl Default for CheckingLimits {
    fn default() -> Self {
        CheckingLimits {
            withdrawal_limit: dec!(500.00),
            daily_withdrawals: 3,
        }
    }
}

/// Withdrawal rules an account is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Standard,
    Checking(CheckingLimits),
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountKind::Standard => write!(f, "standard"),
            AccountKind::Checking(_) => write!(f, "checking"),
        }
    }
}

/// A balance plus its history.
///
/// The balance only moves through [`Account::deposit`] and
/// [`Account::withdraw`]. The log is appended to by
/// [`Transaction::register_on`](crate::transaction::Transaction::register_on)
/// after one of those succeeds.
#[derive(Debug, Clone)]
pub struct Account {
    number: AccountNumber,
    branch: String,
    owner: TaxId,
    balance: Decimal,
    kind: AccountKind,
    log: TransactionLog,
}

/// Opens a checking account for `client` with the default branch and limits.
pub fn new_account(client: &Client, number: AccountNumber) -> Account {
    Account::checking(
        number,
        DEFAULT_BRANCH,
        client.tax_id().clone(),
        CheckingLimits::default(),
    )
}

impl Account {
    pub fn standard(number: AccountNumber, branch: impl Into<String>, owner: TaxId) -> Self {
        Self::with_kind(number, branch.into(), owner, AccountKind::Standard)
    }

    pub fn checking(
        number: AccountNumber,
        branch: impl Into<String>,
        owner: TaxId,
        limits: CheckingLimits,
    ) -> Self {
        Self::with_kind(number, branch.into(), owner, AccountKind::Checking(limits))
    }

    fn with_kind(number: AccountNumber, branch: String, owner: TaxId, kind: AccountKind) -> Self {
        Account {
            number,
            branch,
            owner,
            balance: Decimal::ZERO,
            kind,
            log: TransactionLog::new(),
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn owner(&self) -> &TaxId {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    pub(crate) fn log_mut(&mut self) -> &mut TransactionLog {
        &mut self.log
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        Ok(())
    }

    /// Withdraws `amount`, using `now` to decide which logged withdrawals
    /// count towards today's limit on checking accounts.
    pub fn withdraw(&mut self, amount: Decimal, now: &Timestamp) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }

        if let AccountKind::Checking(limits) = self.kind {
            if amount > limits.withdrawal_limit {
                return Err(LedgerError::ExceedsLimit {
                    requested: amount,
                    limit: limits.withdrawal_limit,
                });
            }
            if self.withdrawals_today(now) >= limits.daily_withdrawals as usize {
                return Err(LedgerError::DailyLimitExceeded {
                    max: limits.daily_withdrawals,
                });
            }
        }

        self.balance -= amount;
        Ok(())
    }

    #[inline]
    pub fn withdrawals_today(&self, now: &Timestamp) -> usize {
        self.log.count_on(TransactionKind::Withdrawal, now)
    }
}
