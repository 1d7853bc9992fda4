//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, QueryArgs};
use crate::config::ClientConfig;
use crate::decode::RawRecord;
use crate::error::{Error, Result};
use crate::http::HttpTransport;
use crate::pagination::PaginationEngine;
use crate::projection::RecordProjection;
use crate::query::{api_base_url, QueryDescriptor, RequestBuilder};
use std::sync::Arc;
use tracing::info;

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
            Commands::List { query, max } => self.list(query, *max).await,
            Commands::Url { query } => self.url(query),
        }
    }

    /// Resolve the client configuration from file and flags
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(api) = &self.cli.api {
            config.api_url.clone_from(api);
        }

        if config.api_url.is_empty() {
            return Err(Error::config(
                "API URL not specified (use --api or a config file)",
            ));
        }
        config.validate()?;
        Ok(config)
    }

    /// Build the descriptor for a listing
    fn descriptor(&self, query: &QueryArgs, config: &ClientConfig) -> Result<QueryDescriptor> {
        QueryDescriptor::builder(&query.subject)
            .kind(query.kind)
            .namespaces(query.namespaces.iter().copied())
            .page_limit(query.limit.unwrap_or(config.default_limit))
            .build()
    }

    /// Iterate a listing and print items
    async fn list(&self, query: &QueryArgs, max: Option<usize>) -> Result<()> {
        let config = self.client_config()?;
        let descriptor = self.descriptor(query, &config)?;
        let transport = Arc::new(HttpTransport::from_client_config(&config)?);

        let mut engine = PaginationEngine::new(descriptor, transport, RecordProjection);
        let mut printed = 0usize;

        while max.map_or(true, |m| printed < m) {
            let Some(record) = engine.take_next().await? else {
                break;
            };
            self.output_record(&record)?;
            printed += 1;
        }

        let stats = engine.stats();
        info!(
            items = printed,
            requests = stats.requests,
            skipped = stats.records_skipped,
            "Done"
        );
        Ok(())
    }

    /// Print the first-page URL
    fn url(&self, query: &QueryArgs) -> Result<()> {
        let config = self.client_config()?;
        let descriptor = self.descriptor(query, &config)?;
        let request = RequestBuilder::default().build_first(&descriptor)?;
        let base = api_base_url(&config.api_url)?;
        println!("{}", request.to_url(&base)?);
        Ok(())
    }

    /// Print one record in the selected format
    fn output_record(&self, record: &RawRecord) -> Result<()> {
        match self.cli.format {
            OutputFormat::Text => println!("{}", record.title),
            OutputFormat::Json => println!("{}", serde_json::to_string(record)?),
            OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(record)?),
        }
        Ok(())
    }
}
