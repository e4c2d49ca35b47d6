//! Error taxonomy for the station pipeline.
//!
//! An empty provider result is not an error; it surfaces as
//! [`AirQualityOutcome::NoData`](crate::model::AirQualityOutcome::NoData).

use thiserror::Error;

pub const RADIUS_MESSAGE: &str = "Radius must be between 1 and 25000 meters.";
pub const UPSTREAM_MESSAGE: &str = "Failed to fetch data from OpenAQ API";

#[derive(Error, Debug)]
pub enum AirQualityError {
    /// Rejected before any provider call.
    #[error("{message}")]
    Validation { message: String },

    #[error("Provider request failed with status {status}")]
    Upstream { status: u16 },

    #[error("Failed to reach provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse provider JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Station {station_id} has malformed data: {reason}")]
    DataIntegrity { station_id: String, reason: String },
}

impl AirQualityError {
    pub fn radius_out_of_range() -> Self {
        AirQualityError::Validation { message: RADIUS_MESSAGE.to_string() }
    }

    /// HTTP status an inbound caller should see for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AirQualityError::Validation { .. } => 422,
            AirQualityError::Upstream { status } => *status,
            AirQualityError::Transport(_) | AirQualityError::Decode(_) => 502,
            AirQualityError::DataIntegrity { .. } => 500,
        }
    }

    /// Message exposed to inbound callers. Provider failures stay generic.
    pub fn public_detail(&self) -> String {
        match self {
            AirQualityError::Validation { message } => message.clone(),
            AirQualityError::Upstream { .. }
            | AirQualityError::Transport(_)
            | AirQualityError::Decode(_) => UPSTREAM_MESSAGE.to_string(),
            AirQualityError::DataIntegrity { .. } => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AirQualityError>;
