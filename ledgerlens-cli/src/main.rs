use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledgerlens_analytics::{DEFAULT_TOP_N, build_expense_summary, estimate_fire_number};
use ledgerlens_core::Transaction;
use ledgerlens_ingest::load_statement;
use std::path::PathBuf;

mod log;

#[derive(Parser, Debug)]
#[command(name = "ledgerlens", version, about = "Bank statement analytics CLI")]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement export and print the canonical transactions
    Transactions {
        /// Path to the statement export (CSV)
        statement: PathBuf,

        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Build the dashboard expense summary and print it as JSON
    Expenses {
        /// Path to the statement export (CSV)
        statement: PathBuf,

        /// Size of the top-expense list (1-50)
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Estimate a FIRE number from an annual expense
    Fire {
        #[arg(long)]
        annual_expense: f64,

        /// Safe withdrawal rate as a fraction
        #[arg(long, default_value_t = 0.04)]
        withdrawal_rate: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    log::init_logging(cli.verbose);

    match cli.command {
        Command::Transactions { statement, limit } => {
            let txns = load_statement(&statement)
                .with_context(|| format!("loading {}", statement.display()))?;

            println!("Parsed {} transactions from {}", txns.len(), statement.display());
            let limit = limit.unwrap_or(txns.len());
            for txn in txns.iter().take(limit) {
                print_transaction(txn);
            }
        }

        Command::Expenses { statement, top, pretty } => {
            let txns = load_statement(&statement)
                .with_context(|| format!("loading {}", statement.display()))?;

            let summary = build_expense_summary(&txns, top)?;
            let json = if pretty {
                serde_json::to_string_pretty(&summary)?
            } else {
                serde_json::to_string(&summary)?
            };
            println!("{json}");
        }

        Command::Fire { annual_expense, withdrawal_rate } => {
            let number = estimate_fire_number(annual_expense, withdrawal_rate)?;
            println!(
                "FIRE number at {:.1}% withdrawal: {:.2}",
                withdrawal_rate * 100.0,
                number
            );
        }
    }

    Ok(())
}

fn print_transaction(txn: &Transaction) {
    println!(
        "{} {:>12.2} [{}] {} > {} | {}",
        txn.date,
        txn.amount,
        txn.txn_type.as_str(),
        txn.category_l1,
        txn.category_l2,
        txn.description
    );
}
