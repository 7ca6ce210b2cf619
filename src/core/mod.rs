//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Inventory record model and condition statistics types
//! - Delimited file loading
//! - Rendering functions for different output formats
//! - Load error types

pub mod error;
pub mod loader;
pub mod model;
pub mod render;
