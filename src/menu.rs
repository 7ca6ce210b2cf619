//! Interactive menu
//!
//! A numbered prompt loop over the same table queries the subcommands use.
//! Input and output are generic so the loop can be driven from tests.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::core::loader::LoadOptions;
use crate::core::model::Rounding;
use crate::core::render::{overview_text, table_lines, OutputFormat, Renderer};
use crate::inventory::table::{NO_ID_MATCH, NO_NAME_MATCH};
use crate::inventory::{InventoryTable, PageQuery};

const MENU: &str = "\nAvailable commands:\n\
1. Get item by ID\n\
2. Search items by name\n\
3. Calculate condition percentage\n\
4. Display items\n\
5. Display all items with condition percentages\n\
6. Exit";

const GOODBYE: &str = "Exiting CLI. Goodbye!";
const INVALID_NUMBER: &str =
    "Invalid input. Please enter numbers for items per page and page number.";
const INVALID_COMMAND: &str = "Invalid command. Please try again.";

/// Print `message`, then read one trimmed line. `None` means end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<Option<String>> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_lines<W: Write>(output: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(output, "{}", line)?;
    }
    Ok(())
}

/// Run the menu until the user exits or input ends.
///
/// Prompts for the inventory path when `file` is `None`.
pub fn run_menu<R: BufRead, W: Write>(
    file: Option<&Path>,
    options: &LoadOptions,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let path: PathBuf = match file {
        Some(path) => path.to_path_buf(),
        None => {
            let answer = prompt(
                &mut input,
                &mut output,
                "Enter the path to your inventory CSV file: ",
            )?;
            match answer {
                Some(path) => PathBuf::from(path),
                None => {
                    writeln!(output)?;
                    writeln!(output, "{}", GOODBYE)?;
                    return Ok(());
                }
            }
        }
    };

    let table = InventoryTable::open_with(&path, options)
        .with_context(|| format!("failed to load inventory from {}", path.display()))?;
    tracing::info!(path = %path.display(), items = table.len(), "menu session started");

    let percentages = Renderer::new(OutputFormat::Table);

    loop {
        writeln!(output, "{}", MENU)?;

        let choice = match prompt(&mut input, &mut output, "\nEnter the number of the command: ")? {
            Some(choice) => choice,
            None => {
                writeln!(output)?;
                writeln!(output, "{}", GOODBYE)?;
                return Ok(());
            }
        };

        match choice.as_str() {
            "1" => {
                let Some(id) = prompt(&mut input, &mut output, "Enter the item ID: ")? else {
                    continue;
                };
                let found = table.get_by_id(&id);
                if found.is_empty() {
                    writeln!(output, "{}", NO_ID_MATCH)?;
                } else {
                    print_lines(&mut output, &table_lines(&found))?;
                }
            }

            "2" => {
                let Some(term) =
                    prompt(&mut input, &mut output, "Enter the name or part of the name: ")?
                else {
                    continue;
                };
                let found = table.search_by_name(&term);
                if found.is_empty() {
                    writeln!(output, "{}", NO_NAME_MATCH)?;
                } else {
                    print_lines(&mut output, &table_lines(&found))?;
                }
            }

            "3" => {
                let Some(filter) = prompt(
                    &mut input,
                    &mut output,
                    "Enter the name filter (leave blank for all items): ",
                )?
                else {
                    continue;
                };
                let breakdown = table.condition_percentages(Some(&filter), Rounding::Exact);
                writeln!(output, "{}", percentages.render_breakdown(&breakdown))?;
            }

            "4" => {
                let Some(query) = read_page_query(&mut input, &mut output)? else {
                    continue;
                };
                table.display_page(&query, &mut output)?;
            }

            "5" => {
                writeln!(output, "\nAll items with their condition percentages:")?;
                for line in table.overview(Rounding::Exact) {
                    writeln!(output, "{}", overview_text(&line, Rounding::Exact))?;
                }
            }

            "6" => {
                writeln!(output, "{}", GOODBYE)?;
                return Ok(());
            }

            _ => writeln!(output, "{}", INVALID_COMMAND)?,
        }
    }
}

/// Ask for page size, page number and optional filter.
///
/// Returns `None` after reporting bad numbers or when input ends.
fn read_page_query<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<PageQuery>> {
    let Some(per_page) = prompt(input, output, "Enter number of items per page: ")? else {
        return Ok(None);
    };
    let Ok(per_page) = per_page.parse::<usize>() else {
        writeln!(output, "{}", INVALID_NUMBER)?;
        return Ok(None);
    };

    let Some(page) = prompt(input, output, "Enter the page number: ")? else {
        return Ok(None);
    };
    let Ok(page) = page.parse::<usize>() else {
        writeln!(output, "{}", INVALID_NUMBER)?;
        return Ok(None);
    };

    let field = prompt(input, output, "Enter filter field (leave blank for no filter): ")?
        .unwrap_or_default();
    let value = prompt(input, output, "Enter filter value (leave blank for no filter): ")?
        .unwrap_or_default();

    // Blank answers leave the filter inactive
    Ok(Some(PageQuery::page(per_page, page).with_filter(field, value)))
}
