//! Output module for persisting harvest results
//!
//! This module handles:
//! - Writing the product document (JSON)
//! - Reading it back
//! - Reporting run statistics

mod json;
pub mod stats;

pub use json::{load_products, persist};
pub use stats::{print_statistics, HarvestStats};
