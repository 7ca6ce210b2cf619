//! survinv - query a survival inventory table loaded from a CSV file
//!
//! survinv provides:
//! - Loading of a delimited inventory file (ID, Name, Type, Condition, Amount)
//! - Lookup by ID and case-insensitive name search
//! - Paged and field-filtered table display
//! - Condition percentage statistics
//! - An interactive numbered menu over the same queries

use clap::Parser;
use colored::Colorize;

mod cli;
mod core;
mod inventory;
mod menu;

fn main() {
    let cli = cli::Cli::parse();
    cli.init_logging();

    if let Err(err) = cli::run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
