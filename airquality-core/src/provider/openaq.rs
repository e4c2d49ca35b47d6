use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{
    error::{AirQualityError, Result},
    model::{AirQualityQuery, LocationsResponse, RawStation},
};

use super::StationProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openaq.org";

#[derive(Clone)]
pub struct OpenAqProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenAqProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn locations_url(&self) -> String {
        format!("{}/v3/locations", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for OpenAqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAqProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn query_params(query: &AirQualityQuery) -> [(&'static str, String); 3] {
    [
        ("coordinates", query.coordinates()),
        ("radius", query.radius_meters.to_string()),
        ("limit", query.limit.to_string()),
    ]
}

fn parse_locations(body: &str) -> Result<Vec<RawStation>> {
    let parsed: LocationsResponse = serde_json::from_str(body)?;
    Ok(parsed.results)
}

#[async_trait]
impl StationProvider for OpenAqProvider {
    async fn fetch_stations(&self, query: &AirQualityQuery) -> Result<Vec<RawStation>> {
        let url = self.locations_url();
        debug!(
            %url,
            coordinates = %query.coordinates(),
            radius = query.radius_meters,
            limit = query.limit,
            "Querying OpenAQ locations"
        );

        let mut req = self.http.get(&url).query(&query_params(query));
        if let Some(key) = &self.api_key {
            req = req.header("X-API-Key", key);
        }

        let res = req.send().await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(AirQualityError::Upstream { status: status.as_u16() });
        }

        let body = res.text().await?;
        let stations = parse_locations(&body)?;
        debug!(count = stations.len(), "OpenAQ returned stations");

        Ok(stations)
    }
}
