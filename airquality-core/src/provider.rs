use crate::{
    Config,
    error::Result,
    model::{AirQualityQuery, RawStation},
    provider::openaq::OpenAqProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openaq;

/// Source of raw station records around a point.
///
/// Implementations make exactly one upstream request per call and never
/// retry. An empty `Vec` means the provider answered with no stations.
#[async_trait]
pub trait StationProvider: Send + Sync + Debug {
    async fn fetch_stations(&self, query: &AirQualityQuery) -> Result<Vec<RawStation>>;
}

/// Construct the configured provider.
pub fn provider_from_config(config: &Config) -> Box<dyn StationProvider> {
    if config.provider.api_key.is_none() {
        tracing::warn!("No OpenAQ API key configured; requests will be sent without X-API-Key");
    }

    Box::new(
        OpenAqProvider::new(config.provider.api_key.clone())
            .with_base_url(config.provider.base_url.clone()),
    )
}
