//! # Cell Finder Telegram Bot
//!
//! A Telegram bot for warehouse operators: given the cell where an item
//! should be but is not, it lists the cells whose numbers are easy to
//! confuse with it (one wrong digit, swapped digits, common digit confusions,
//! a label read upside-down).

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod observability;
pub mod observability_config;
pub mod settings;
pub mod similar_cells;
pub mod validation;

// Re-export types for easier access
pub use similar_cells::{analyze_cell, generate_similar_numbers, rotate_number, SimilarityReport};
