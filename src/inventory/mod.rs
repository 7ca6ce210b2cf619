//! Inventory module - Queries over a loaded inventory table
//!
//! Provides:
//! - table: lookup by ID, name search and page selection
//! - stats: condition percentages and the per-item overview

pub mod stats;
pub mod table;

pub use table::{InventoryTable, PageQuery};
