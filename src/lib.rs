pub mod account;
pub mod bank;
pub mod client;
pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod history;
pub mod processor;
pub mod shell;
pub mod statement;
pub mod transaction;
