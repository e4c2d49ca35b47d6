use airquality_core::{
    AirQualityOutcome, AirQualityQuery, AirQualityService, Config,
    model::{DEFAULT_LIMIT, DEFAULT_RADIUS_METERS},
    provider_from_config,
};
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

use crate::http::{self, NO_DATA_MESSAGE};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "airquality", version, about = "PM2.5 air-quality stations from OpenAQ")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the `/air_quality` HTTP endpoint.
    Serve {
        /// Address to bind, e.g. "127.0.0.1:8000". Overrides the config file.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Query stations once and print them as JSON.
    Fetch {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in meters (1..=25000).
        #[arg(long, default_value_t = DEFAULT_RADIUS_METERS, allow_hyphen_values = true)]
        radius: i64,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Store the OpenAQ API key in the config file.
    Configure {
        /// API key; prompted for interactively when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print the effective configuration with secrets masked.
    ShowConfig,
}

impl Cli {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let path = self.config_path()?;

        match self.command {
            Command::Serve { bind } => {
                let config = Config::load_from(&path)?;
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                let service = Arc::new(AirQualityService::new(provider_from_config(&config)));

                http::run_http_server(service, &bind).await?;
            }
            Command::Fetch { lat, lon, radius, limit } => {
                let config = Config::load_from(&path)?;
                let service = AirQualityService::new(provider_from_config(&config));
                let query = AirQualityQuery::new(lat, lon).with_radius(radius).with_limit(limit);

                match service.air_quality(&query).await? {
                    AirQualityOutcome::Stations(readings) => {
                        println!("{}", serde_json::to_string_pretty(&readings)?);
                    }
                    AirQualityOutcome::NoData => println!("{NO_DATA_MESSAGE}"),
                }
            }
            Command::Configure { api_key } => {
                let api_key = match api_key {
                    Some(key) => key,
                    None => inquire::Password::new("OpenAQ API key:")
                        .without_confirmation()
                        .prompt()
                        .context("Failed to read API key")?,
                };
                let api_key = api_key.trim().to_string();
                anyhow::ensure!(!api_key.is_empty(), "API key must not be empty");

                // File values only, so environment overrides are never persisted.
                let mut config = Config::read_file(&path)?;
                config.set_api_key(api_key);
                config.save_to(&path)?;

                info!(path = %path.display(), "Saved OpenAQ API key");
                println!("Saved configuration to {}", path.display());
            }
            Command::ShowConfig => {
                let config = Config::load_from(&path)?;
                println!("config file       = {}", path.display());
                println!("{}", config.summary());
            }
        }

        Ok(())
    }
}
