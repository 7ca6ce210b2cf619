//! In-memory inventory table
//!
//! Lookup, substring search and page selection over the loaded records.
//! Every query is a linear scan; the table never changes after loading.

use anyhow::Result;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::error;
use crate::core::loader::{load_with, LoadOptions};
use crate::core::model::{Record, ID, NAME};
use crate::core::render::{write_table, OutputFormat, RenderConfig, Renderer, NO_ITEMS};

/// Printed when `get` matches nothing
pub const NO_ID_MATCH: &str = "No item found with that ID.";

/// Printed when `search` matches nothing
pub const NO_NAME_MATCH: &str = "No items found matching that name.";

/// The records of one source file, in file order
#[derive(Debug, Clone)]
pub struct InventoryTable {
    path: PathBuf,
    records: Vec<Record>,
}

impl InventoryTable {
    /// Load a comma-delimited inventory file
    #[allow(dead_code)]
    pub fn open(path: impl AsRef<Path>) -> error::Result<Self> {
        Self::open_with(path, &LoadOptions::default())
    }

    /// Load an inventory file with explicit parse options
    pub fn open_with(path: impl AsRef<Path>, options: &LoadOptions) -> error::Result<Self> {
        let path = path.as_ref();
        let records = load_with(path, options)?;
        Ok(Self::from_records(path, records))
    }

    /// Wrap already-loaded records
    pub fn from_records(path: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }

    /// Source file the table was loaded from
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record whose `ID` equals `id` as a string.
    ///
    /// IDs are not unique, so this may return several records. Records
    /// without an `ID` column never match.
    pub fn get_by_id(&self, id: impl Display) -> Vec<&Record> {
        let id = id.to_string();
        let found: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| r.get(ID) == Some(id.as_str()))
            .collect();
        tracing::debug!(id = %id, matches = found.len(), "lookup by id");
        found
    }

    /// Every record whose `Name` contains `term`, ignoring case.
    ///
    /// An empty term matches everything.
    pub fn search_by_name(&self, term: &str) -> Vec<&Record> {
        let term = term.to_lowercase();
        let found: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| name_contains(r, &term))
            .collect();
        tracing::debug!(term = %term, matches = found.len(), "search by name");
        found
    }

    /// Records selected by `query`, without rendering anything
    pub fn select_page(&self, query: &PageQuery) -> Vec<&Record> {
        if let Some(filter) = query.active_filter() {
            let wanted = filter.value.to_lowercase();
            return self
                .records
                .iter()
                .filter(|r| r.get_or(&filter.field, "").to_lowercase() == wanted)
                .collect();
        }

        let start = match query.page.checked_sub(1) {
            Some(index) => index.saturating_mul(query.items_per_page),
            None => return Vec::new(),
        };
        let end = start.saturating_add(query.items_per_page).min(self.records.len());

        if start >= end {
            return Vec::new();
        }
        self.records[start..end].iter().collect()
    }

    /// Select records for `query` and write them as a fixed-width table.
    ///
    /// Returns the records that were written.
    pub fn display_page<W: Write>(
        &self,
        query: &PageQuery,
        writer: W,
    ) -> std::io::Result<Vec<&Record>> {
        let selected = self.select_page(query);
        write_table(&selected, writer)?;
        Ok(selected)
    }
}

/// Case-insensitive `Name` containment; `term` must already be lowercase
pub(crate) fn name_contains(record: &Record, term: &str) -> bool {
    record.get_or(NAME, "").to_lowercase().contains(term)
}

/// Exact, case-insensitive match on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

/// Parameters for [`InventoryTable::select_page`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub items_per_page: usize,
    /// 1-based page number
    pub page: usize,
    /// When active, pagination is ignored
    pub filter: Option<FieldFilter>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            items_per_page: 10,
            page: 1,
            filter: None,
        }
    }
}

impl PageQuery {
    pub fn page(items_per_page: usize, page: usize) -> Self {
        Self {
            items_per_page,
            page,
            filter: None,
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// The filter, if both its field and value are non-empty
    fn active_filter(&self) -> Option<&FieldFilter> {
        self.filter
            .as_ref()
            .filter(|f| !f.field.is_empty() && !f.value.is_empty())
    }
}

/// Run the get command
pub fn run_get(table: &InventoryTable, id: &str, config: RenderConfig) -> Result<()> {
    let found = table.get_by_id(id);
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render_records(&found, NO_ID_MATCH));
    Ok(())
}

/// Run the search command
pub fn run_search(table: &InventoryTable, term: &str, config: RenderConfig) -> Result<()> {
    let found = table.search_by_name(term);
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render_records(&found, NO_NAME_MATCH));
    Ok(())
}

/// Run the show command
pub fn run_show(table: &InventoryTable, query: &PageQuery, config: RenderConfig) -> Result<()> {
    if config.format == OutputFormat::Table {
        let stdout = std::io::stdout();
        table.display_page(query, stdout.lock())?;
    } else {
        let selected = table.select_page(query);
        let renderer = Renderer::with_config(config);
        println!("{}", renderer.render_records(&selected, NO_ITEMS));
    }
    Ok(())
}
