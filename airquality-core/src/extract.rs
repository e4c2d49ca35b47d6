use serde_json::Value;

use crate::{error::AirQualityError, model::RawStation};

pub const PM25_PARAMETER: &str = "pm25";

/// Return the PM2.5 reading of a station, if it reports one.
///
/// Sensors are scanned in the order the provider listed them and the first
/// one whose parameter name is exactly `pm25` wins; later pm25 sensors are
/// ignored. A matching sensor whose value is not a finite number is an error.
pub fn find_pm25(station: &RawStation) -> Result<Option<f64>, AirQualityError> {
    for sensor in &station.sensors {
        if sensor.parameter.name == PM25_PARAMETER {
            return coerce_value(&sensor.value)
                .map(Some)
                .ok_or_else(|| AirQualityError::DataIntegrity {
                    station_id: station.id_label(),
                    reason: format!("pm25 value {} is not a finite number", sensor.value),
                });
        }
    }
    Ok(None)
}

fn coerce_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    // "NaN" and "inf" parse, but cannot be serialized back as JSON numbers.
    parsed.filter(|v| v.is_finite())
}
