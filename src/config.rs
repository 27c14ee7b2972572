//! Defaults applied when the bank opens a new account.

use clap::Args;
use rust_decimal::Decimal;

use crate::account::{CheckingLimits, DEFAULT_BRANCH};
use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct AccountDefaults {
    /// Branch code for new accounts
    #[arg(long, env = "LEDGER_BRANCH", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Largest amount a single withdrawal may take from a checking account
    #[arg(long, env = "LEDGER_WITHDRAWAL_LIMIT", default_value = "500.00")]
    pub withdrawal_limit: Decimal,

    /// Successful withdrawals allowed per checking account per calendar day
    #[arg(long, env = "LEDGER_DAILY_WITHDRAWALS", default_value_t = 3)]
    pub daily_withdrawals: u32,
}

impl Default for AccountDefaults {
    fn default() -> Self {
        let limits = CheckingLimits::default();
        AccountDefaults {
            branch: DEFAULT_BRANCH.to_string(),
            withdrawal_limit: limits.withdrawal_limit,
            daily_withdrawals: limits.daily_withdrawals,
        }
    }
}

impl AccountDefaults {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.branch.trim().is_empty() {
            return Err(LedgerError::InvalidConfig(
                "branch must not be empty".to_string(),
            ));
        }
        if self.withdrawal_limit <= Decimal::ZERO {
            return Err(LedgerError::InvalidConfig(format!(
                "withdrawal limit must be positive, got {}",
                self.withdrawal_limit
            )));
        }
        if self.daily_withdrawals == 0 {
            return Err(LedgerError::InvalidConfig(
                "daily withdrawals must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn limits(&self) -> CheckingLimits {
        CheckingLimits {
            withdrawal_limit: self.withdrawal_limit,
            daily_withdrawals: self.daily_withdrawals,
        }
    }
}
