//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::cli::server::{serve, ServerConfig};
use crate::error::{Error, Result};
use crate::http::RequestContext;
use crate::loader::{load_config, load_items};
use crate::pagination::{DateExtractor, StrategyKind};
use crate::render::{CollectionRenderer, MemorySource};
use crate::types::JsonValue;
use futures::future::ready;
use serde_json::json;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Serve { config, port } => {
                let service = load_config(config)?;
                tracing::info!(
                    collections = ?service.names(),
                    "Loaded {}",
                    config.display()
                );
                serve(ServerConfig::new(service), *port).await
            }
            Commands::Links {
                url,
                strategy,
                count,
                items,
                date_field,
                links_only,
            } => {
                self.links(
                    url,
                    *strategy,
                    *count,
                    items.as_deref(),
                    date_field.as_deref(),
                    *links_only,
                )
                .await
            }
            Commands::Strategies => self.strategies(),
        }
    }

    /// Render one page and print the envelope
    async fn links(
        &self,
        url: &str,
        strategy: StrategyKind,
        count: Option<u64>,
        items: Option<&Path>,
        date_field: Option<&str>,
        links_only: bool,
    ) -> Result<()> {
        let items: Vec<JsonValue> = match items {
            Some(path) => load_items(path)?,
            None => Vec::new(),
        };

        if strategy.is_cursor() && date_field.is_none() {
            return Err(Error::invalid_value(
                "date_field",
                format!("strategy '{strategy}' requires --date-field"),
            ));
        }

        let mut renderer = CollectionRenderer::<JsonValue>::new(strategy);
        renderer = match date_field {
            Some(field) => {
                let extractor = DateExtractor::field(field);
                let mut source = MemorySource::with_timestamps(items, &extractor);
                if !strategy.is_cursor() {
                    source = source.offset_only();
                }
                renderer.source(source).date_extractor(extractor)
            }
            None => renderer.source(MemorySource::new(items)),
        };
        if let Some(total) = count {
            renderer = renderer.count_source(move || ready(Ok::<u64, Error>(total)));
        }

        let request = RequestContext::parse(url)?;
        let collection = renderer.render(&request).await?;

        let output = if links_only {
            serde_json::to_string_pretty(&collection.links)?
        } else {
            serde_json::to_string_pretty(&collection)?
        };
        println!("{output}");
        Ok(())
    }

    /// Print the available strategies
    fn strategies(&self) -> Result<()> {
        let strategies: Vec<_> = StrategyKind::ALL
            .iter()
            .map(|kind| {
                json!({
                    "name": kind.as_str(),
                    "cursor": kind.is_cursor(),
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&strategies)?);
        Ok(())
    }
}
