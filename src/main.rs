use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bank_ledger::bank::Bank;
use bank_ledger::config::AccountDefaults;
use bank_ledger::processor::process_csv_stream;
use bank_ledger::shell::Shell;

/// In-memory banking ledger with an interactive menu
#[derive(Parser)]
#[command(name = "bank-ledger", version, about)]
struct Cli {
    #[command(flatten)]
    defaults: AccountDefaults,

    /// Log filter, e.g. `debug` or `bank_ledger=info`
    #[arg(long, env = "LEDGER_LOG", default_value = "warn", global = true)]
    log: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive menu (default)
    Shell,
    /// Replay a CSV script of operations and print the resulting accounts
    Run {
        /// CSV file with header `type, tax_id, account, amount, name, birth_date, address`
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).context("invalid log filter")?)
        .with_writer(io::stderr)
        .init();

    cli.defaults.validate()?;
    let mut bank = Bank::new(cli.defaults);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let mut shell = Shell::new(bank, io::stdin().lock(), io::stdout().lock());
            shell.run().context("terminal I/O failed")?;
        }
        Command::Run { script } => {
            let file = File::open(&script)
                .with_context(|| format!("failed to open {}", script.display()))?;
            process_csv_stream(&mut bank, BufReader::new(file));
            print!("{}", bank);
        }
    }
    Ok(())
}
