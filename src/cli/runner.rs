//! CLI runner - executes commands

use crate::adapter::TastypieAdapter;
use crate::auth::AuthConfig;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConnectorSettings;
use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::http::QueryParams;
use futures::StreamExt;
use serde_json::Value;
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
            Commands::Fetch { resource, params } => self.fetch(resource, params).await,
            Commands::Iter {
                resource,
                params,
                max_docs,
            } => self.iter(resource, params, *max_docs).await,
            Commands::Post { resource, data } => self.post(resource, data).await,
        }
    }

    /// Connector settings from the settings file, overridden by flags
    pub fn settings(&self) -> Result<ConnectorSettings> {
        let mut settings = match (&self.cli.config, &self.cli.api_uri) {
            (Some(path), _) => ConnectorSettings::from_file(path)?,
            (None, Some(uri)) => ConnectorSettings::new(uri),
            (None, None) => {
                return Err(Error::config(
                    "API URI not specified (use --api-uri or --config)",
                ))
            }
        };

        if let (Some(_), Some(uri)) = (&self.cli.config, &self.cli.api_uri) {
            settings.api_uri.clone_from(uri);
        }
        if let (Some(username), Some(api_key)) = (&self.cli.username, &self.cli.api_key) {
            settings.auth = Some(AuthConfig::ApiKey {
                username: username.clone(),
                api_key: api_key.clone(),
            });
        }
        if self.cli.verify_tls {
            settings.check_ca = true;
        }
        if let Some(retries) = self.cli.max_retries {
            settings.max_retries = retries;
        }
        if let Some(factor) = self.cli.retry_factor {
            settings.retry_timeout_factor = factor;
        }
        if let Some(items) = self.cli.items_per_request {
            settings.items_per_request = items;
        }
        if let Some(agent) = &self.cli.user_agent {
            settings.user_agent = Some(agent.clone());
        }

        Ok(settings)
    }

    fn connector(&self) -> Result<Connector<TastypieAdapter>> {
        let config = self.settings()?.into_config()?;
        Connector::new(config, TastypieAdapter::new())
    }

    async fn fetch(&self, resource: &str, params: &[String]) -> Result<()> {
        let connector = self.connector()?;
        let params = params_from(params)?;

        let data = connector.fetch_data(Some(resource), params.as_ref()).await?;
        self.output(&data)
    }

    async fn iter(&self, resource: &str, params: &[String], max_docs: Option<usize>) -> Result<()> {
        let connector = self.connector()?;
        let params = params_from(params)?;

        if max_docs == Some(0) {
            return Ok(());
        }

        let mut documents = connector.iter_documents(Some(resource), params);
        let mut count = 0;
        while let Some(document) = documents.next().await {
            self.output(&document?)?;
            count += 1;
            if max_docs.is_some_and(|max| count >= max) {
                break;
            }
        }

        info!(
            documents = count,
            pages = documents.pages_fetched(),
            "Finished reading {}",
            resource
        );
        Ok(())
    }

    async fn post(&self, resource: &str, data: &str) -> Result<()> {
        let connector = self.connector()?;
        let data: Value = serde_json::from_str(data)?;

        let location = connector.post_data(Some(resource), data).await?;
        println!("{location}");
        Ok(())
    }

    fn output(&self, value: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{line}");
        Ok(())
    }
}

/// Parse a `key=value` query parameter
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(Error::invalid_value(
            "param",
            format!("expected key=value, got '{raw}'"),
        )),
    }
}

fn params_from(raw: &[String]) -> Result<Option<QueryParams>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let pairs = raw
        .iter()
        .map(|p| parse_param(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(pairs.into_iter().collect()))
}
