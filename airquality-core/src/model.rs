use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{classify::ColorBand, error::AirQualityError};

pub const DEFAULT_RADIUS_METERS: i64 = 12_000;
pub const MAX_RADIUS_METERS: i64 = 25_000;
pub const DEFAULT_LIMIT: u32 = 100;

/// A bounded-radius search around a point.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: i64,
    pub limit: u32,
}

impl AirQualityQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_meters: DEFAULT_RADIUS_METERS,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_radius(mut self, radius_meters: i64) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Radius must lie in (0, 25000].
    pub fn validate(&self) -> Result<(), AirQualityError> {
        if self.radius_meters <= 0 || self.radius_meters > MAX_RADIUS_METERS {
            return Err(AirQualityError::radius_out_of_range());
        }
        Ok(())
    }

    /// Provider coordinate order is longitude first.
    pub fn coordinates(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

/// Station record as returned by the provider's `locations` resource.
///
/// Only `sensors` is decoded up front. Identity and location stay untyped
/// until [`RawStation::details`] is called, so a station that is going to be
/// skipped cannot fail the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sensors: Vec<RawSensor>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawStation {
    /// Provider id for log and error messages; `<unknown>` when absent.
    pub fn id_label(&self) -> String {
        match self.fields.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<unknown>".to_string(),
        }
    }

    pub fn details(&self) -> Result<StationDetails, AirQualityError> {
        StationDetails::deserialize(Value::Object(self.fields.clone())).map_err(|e| {
            AirQualityError::DataIntegrity { station_id: self.id_label(), reason: e.to_string() }
        })
    }
}

/// Identity and location of a station that reports pm25.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDetails {
    pub id: i64,
    pub name: String,
    #[serde(default = "unknown_locality", deserialize_with = "locality_or_unknown")]
    pub locality: String,
    pub country: RawCountry,
    pub coordinates: RawCoordinates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSensor {
    pub parameter: RawParameter,
    /// Kept untyped; coercion happens in the extractor.
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParameter {
    pub name: String,
}

/// Body of a `GET /v3/locations` response.
#[derive(Debug, Deserialize)]
pub struct LocationsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RawStation>,
}

fn unknown_locality() -> String {
    "Unknown".to_string()
}

fn locality_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_locality))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One classified station in the output list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReading {
    pub id: i64,
    pub name: String,
    pub locality: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pm25: f64,
    pub color: ColorBand,
}

impl StationReading {
    pub fn assemble(details: StationDetails, pm25: f64) -> Self {
        Self {
            id: details.id,
            name: details.name,
            locality: details.locality,
            country: details.country.name,
            latitude: details.coordinates.latitude,
            longitude: details.coordinates.longitude,
            pm25,
            color: ColorBand::from_pm25(pm25),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AirQualityOutcome {
    Stations(Vec<StationReading>),
    /// The provider answered but listed no stations.
    NoData,
}
