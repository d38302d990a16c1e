//! Service definition loader
//!
//! Parse collection definitions from YAML or JSON files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ServiceConfig` - The set of collections a server exposes
//! - `CollectionConfig` - Name, strategy, date field and items of one collection
//! - Parsing with validation, and items loaded from side files

mod parser;
mod types;

pub use parser::{load_config, load_config_from_str, load_items};
pub use types::{CollectionConfig, ServiceConfig};
