//! Loader types
//!
//! Declarative service definition types for YAML/JSON parsing.

use crate::pagination::{DateExtractor, StrategyKind};
use crate::render::{CollectionRenderer, MemorySource};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Service Definition
// ============================================================================

/// Top-level service definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceConfig {
    /// Collections exposed by the server
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
}

impl ServiceConfig {
    /// Find a collection by name
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Collection names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }
}

// ============================================================================
// Collection Definition
// ============================================================================

/// One collection served under `/collections/{name}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CollectionConfig {
    /// Collection name, used in the route
    pub name: String,
    /// Free-form description shown in listings
    #[serde(default)]
    pub description: Option<String>,
    /// Link strategy
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Item field holding the timestamp (epoch millis or RFC 3339)
    #[serde(default)]
    pub date_field: Option<String>,
    /// Inline items
    #[serde(default)]
    pub items: Vec<JsonValue>,
    /// JSON array file with the items, relative to the config file
    #[serde(default)]
    pub items_file: Option<PathBuf>,
}

impl CollectionConfig {
    /// Create an empty collection definition
    pub fn new(name: impl Into<String>, strategy: StrategyKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            strategy,
            date_field: None,
            items: Vec::new(),
            items_file: None,
        }
    }

    /// Build the renderer serving this collection's items
    pub fn renderer(&self) -> CollectionRenderer<JsonValue> {
        let renderer = CollectionRenderer::new(self.strategy);
        match &self.date_field {
            Some(field) => {
                let extractor = DateExtractor::field(field.clone());
                let mut source = MemorySource::with_timestamps(self.items.clone(), &extractor);
                if !self.strategy.is_cursor() {
                    source = source.offset_only();
                }
                renderer.source(source).date_extractor(extractor)
            }
            None => renderer.source(MemorySource::new(self.items.clone())),
        }
    }
}
