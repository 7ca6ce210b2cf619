//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::loader::LoadOptions;
use crate::core::model::Rounding;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::inventory::{InventoryTable, PageQuery};

/// survinv - query a survival inventory table loaded from a CSV file.
#[derive(Parser, Debug)]
#[command(name = "survinv")]
#[command(
    author,
    version,
    about,
    long_about = r#"survinv loads an inventory table (ID, Name, Type, Condition, Amount) from a
delimited text file once, then answers a single query about it.

Output formats:
- table: fixed-width text table (default)
- json: a single JSON value
- jsonl: one JSON object per line
- md: Markdown table

Run without a subcommand to start the interactive menu.

Examples:
    survinv --file inventory.csv get 12
    survinv --file inventory.csv search axe
    survinv --file inventory.csv conditions --name canned
    survinv --file inventory.csv show --per-page 20 --page 2
    survinv --file inventory.csv show --field Type --value food
"#
)]
pub struct Cli {
    /// Inventory file to load.
    #[arg(
        short,
        long,
        global = true,
        env = "SURVINV_FILE",
        value_name = "FILE",
        long_help = "Delimited text file whose first row names the columns.\n\n\
Required by every subcommand except `menu`, which prompts for it when missing."
    )]
    pub file: Option<PathBuf>,

    /// Field delimiter (single character).
    #[arg(
        long,
        global = true,
        default_value = ",",
        value_name = "CHAR",
        value_parser = parse_delimiter,
        long_help = "Single-byte field delimiter used by the inventory file.\n\n\
Use `tab` or `\\t` for tab-separated files."
    )]
    pub delimiter: u8,

    /// Output format (table/json/jsonl/md).
    #[arg(
        long,
        global = true,
        default_value = "table",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- table (default)\n\
- json\n\
- jsonl\n\
- md (markdown)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Round condition percentages to N decimal places.
    #[arg(
        long,
        global = true,
        value_name = "N",
        long_help = "Round condition percentages to N decimal places before output.\n\n\
Without this flag percentages are exact; text output still shows two decimals."
    )]
    pub round: Option<u32>,

    /// Disable colored diagnostics.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every item whose ID matches exactly.
    #[command(long_about = "Print every item whose ID column equals ID exactly.\n\n\
IDs are not required to be unique, so several items may be printed.\n\n\
Example:\n\
  survinv --file inventory.csv get 12\n")]
    Get {
        /// Item ID.
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Print every item whose name contains TERM (case-insensitive).
    #[command(long_about = "Print every item whose Name contains TERM, ignoring case.\n\n\
An empty TERM matches every item.\n\n\
Example:\n\
  survinv --file inventory.csv search \"canned\"\n")]
    Search {
        /// Substring to look for in item names.
        #[arg(value_name = "TERM")]
        term: String,
    },

    /// Print the percentage of items per condition.
    #[command(long_about = "Group items by their Condition column and print each group's share.\n\n\
Items without a condition are counted as \"Unknown\".\n\n\
Examples:\n\
  survinv --file inventory.csv conditions\n\
  survinv --file inventory.csv --round 2 conditions --name bread\n")]
    Conditions {
        /// Only count items whose name contains this text.
        #[arg(long, value_name = "TEXT")]
        name: Option<String>,
    },

    /// Print one page of items, or every item matching a field filter.
    #[command(long_about = "Print a page of the table in file order.\n\n\
When both --field and --value are given, every item whose FIELD equals VALUE\n\
(ignoring case) is printed instead and the page options are ignored.\n\n\
Examples:\n\
  survinv --file inventory.csv show --per-page 20 --page 3\n\
  survinv --file inventory.csv show --field Condition --value rotten\n")]
    Show {
        /// Items per page.
        #[arg(long, default_value_t = 10, value_name = "N")]
        per_page: usize,

        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1, value_name = "N")]
        page: usize,

        /// Column to filter on.
        #[arg(long, value_name = "FIELD", requires = "value")]
        field: Option<String>,

        /// Value the column must equal (case-insensitive).
        #[arg(long, value_name = "VALUE", requires = "field")]
        value: Option<String>,
    },

    /// Print every item with the share of its condition.
    Overview,

    /// Start the interactive menu.
    Menu,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("delimiter must be a single ASCII character, got {:?}", s)),
        },
    }
}

impl Cli {
    /// Install the stderr log subscriber; `RUST_LOG` overrides the flags
    pub fn init_logging(&self) {
        let default = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(!self.no_color)
            .with_target(false)
            .init();

        if self.no_color {
            colored::control::set_override(false);
        }
    }
}

/// Load the table for a non-interactive command
fn open_table(file: Option<&Path>, options: &LoadOptions) -> Result<InventoryTable> {
    let path = file.context("no inventory file given (use --file or set SURVINV_FILE)")?;
    InventoryTable::open_with(path, options)
        .with_context(|| format!("failed to load inventory from {}", path.display()))
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let rounding = cli.round.map(Rounding::Decimals).unwrap_or_default();
    let render_config = RenderConfig::new(format)
        .with_pretty(cli.pretty)
        .with_rounding(rounding);
    let options = LoadOptions::with_delimiter(cli.delimiter);
    let file = cli.file.as_deref();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Get { id } => {
            crate::inventory::table::run_get(&open_table(file, &options)?, &id, render_config)
        }

        Commands::Search { term } => {
            crate::inventory::table::run_search(&open_table(file, &options)?, &term, render_config)
        }

        Commands::Conditions { name } => crate::inventory::stats::run_conditions(
            &open_table(file, &options)?,
            name.as_deref(),
            render_config,
        ),

        Commands::Show {
            per_page,
            page,
            field,
            value,
        } => {
            let mut query = PageQuery::page(per_page, page);
            if let (Some(field), Some(value)) = (field, value) {
                query = query.with_filter(field, value);
            }
            crate::inventory::table::run_show(&open_table(file, &options)?, &query, render_config)
        }

        Commands::Overview => {
            crate::inventory::stats::run_overview(&open_table(file, &options)?, render_config)
        }

        Commands::Menu => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            crate::menu::run_menu(file, &options, stdin.lock(), stdout.lock())
        }
    }
}
