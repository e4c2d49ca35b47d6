use tracing::{debug, info};

use crate::{
    error::Result,
    extract::find_pm25,
    model::{AirQualityOutcome, AirQualityQuery, StationReading},
    provider::StationProvider,
};

/// Fetch → extract → classify → assemble, one provider call per request.
#[derive(Debug)]
pub struct AirQualityService {
    provider: Box<dyn StationProvider>,
}

impl AirQualityService {
    pub fn new(provider: Box<dyn StationProvider>) -> Self {
        Self { provider }
    }

    /// Classified stations around the query point, in provider order.
    ///
    /// Stations without a pm25 sensor are left out without their other fields
    /// being looked at. A malformed pm25 value, or a pm25 station missing its
    /// identity or coordinates, aborts the whole request.
    pub async fn air_quality(&self, query: &AirQualityQuery) -> Result<AirQualityOutcome> {
        query.validate()?;

        let stations = self.provider.fetch_stations(query).await?;
        if stations.is_empty() {
            info!(coordinates = %query.coordinates(), "Provider returned no stations");
            return Ok(AirQualityOutcome::NoData);
        }

        let mut readings = Vec::with_capacity(stations.len());
        for station in &stations {
            let Some(pm25) = find_pm25(station)? else {
                debug!(station_id = %station.id_label(), "Station has no pm25 sensor, skipping");
                continue;
            };

            let reading = StationReading::assemble(station.details()?, pm25);
            debug!(
                station_id = reading.id,
                pm25,
                band = reading.color.label(),
                "Classified station"
            );
            readings.push(reading);
        }

        info!(
            stations = stations.len(),
            with_pm25 = readings.len(),
            "Classified air-quality stations"
        );

        Ok(AirQualityOutcome::Stations(readings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classify::ColorBand, error::AirQualityError, model::RawStation,
        provider::mock::MockProvider,
    };
    use serde_json::{Value, json};

    fn station(id: i64, sensors: Value) -> RawStation {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("Station {id}"),
            "country": { "name": "Testland" },
            "coordinates": { "latitude": 10.0, "longitude": 20.0 },
            "sensors": sensors,
        }))
        .unwrap()
    }

    fn pm25(value: Value) -> Value {
        json!([{ "parameter": { "name": "pm25" }, "value": value }])
    }

    fn service(mock: &MockProvider) -> AirQualityService {
        AirQualityService::new(Box::new(mock.clone()))
    }

    #[tokio::test]
    async fn single_good_station() {
        let mock = MockProvider::returning(vec![station(1, pm25(json!(10)))]);

        let outcome = service(&mock).air_quality(&AirQualityQuery::new(10.0, 20.0)).await.unwrap();

        let AirQualityOutcome::Stations(readings) = outcome else {
            panic!("expected stations");
        };
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].pm25, 10.0);
        assert_eq!(readings[0].color, ColorBand::Good);
        assert_eq!(readings[0].locality, "Unknown");
        assert_eq!(readings[0].country, "Testland");
    }

    #[tokio::test]
    async fn out_of_range_radius_never_calls_provider() {
        let mock = MockProvider::returning(vec![station(1, pm25(json!(10)))]);
        let svc = service(&mock);

        for radius in [0, -1, 25_001, 30_000] {
            let q = AirQualityQuery::new(1.0, 2.0).with_radius(radius);
            let err = svc.air_quality(&q).await.unwrap_err();
            assert!(matches!(err, AirQualityError::Validation { .. }), "radius {radius}");
        }

        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn valid_query_makes_exactly_one_call() {
        let mock = MockProvider::returning(vec![]);
        let q = AirQualityQuery::new(51.5, -0.12).with_radius(25_000).with_limit(5);

        service(&mock).air_quality(&q).await.unwrap();

        assert_eq!(mock.call_count(), 1);
        let seen = mock.last_query().expect("query recorded");
        assert_eq!(seen.coordinates(), "-0.12,51.5");
        assert_eq!(seen.limit, 5);
    }

    #[tokio::test]
    async fn empty_provider_result_is_no_data() {
        let mock = MockProvider::returning(vec![]);
        let outcome = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap();
        assert_eq!(outcome, AirQualityOutcome::NoData);
    }

    #[tokio::test]
    async fn stations_without_pm25_are_dropped_and_order_is_kept() {
        let mock = MockProvider::returning(vec![
            station(3, pm25(json!(200))),
            station(1, json!([{ "parameter": { "name": "o3" }, "value": 0.03 }])),
            station(2, pm25(json!("40"))),
            station(3, pm25(json!(200))),
        ]);

        let outcome = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap();

        let AirQualityOutcome::Stations(readings) = outcome else {
            panic!("expected stations");
        };
        let ids: Vec<i64> = readings.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 3]);
        assert_eq!(readings[0].color, ColorBand::Hazardous);
        assert_eq!(readings[1].color, ColorBand::UnhealthySensitive);
    }

    #[tokio::test]
    async fn no_station_with_pm25_yields_empty_list() {
        let mock = MockProvider::returning(vec![station(1, json!([]))]);
        let outcome = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap();
        assert_eq!(outcome, AirQualityOutcome::Stations(vec![]));
    }

    #[tokio::test]
    async fn upstream_failure_propagates_status() {
        let mock = MockProvider::failing(500);
        let err = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn malformed_pm25_aborts_request() {
        let mock = MockProvider::returning(vec![
            station(1, pm25(json!(5))),
            station(2, pm25(json!("broken"))),
        ]);

        let err = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(
            err,
            AirQualityError::DataIntegrity { ref station_id, .. } if station_id == "2"
        ));
    }

    #[tokio::test]
    async fn nan_pm25_never_reaches_output() {
        let mock = MockProvider::returning(vec![station(1, pm25(json!("NaN")))]);

        let err = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn incomplete_station_without_pm25_is_skipped() {
        let bare: RawStation = serde_json::from_value(json!({
            "id": 2,
            "sensors": [{ "parameter": { "name": "o3" }, "value": 0.02 }],
        }))
        .unwrap();
        let mock = MockProvider::returning(vec![station(1, pm25(json!(8))), bare]);

        let outcome = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap();

        let AirQualityOutcome::Stations(readings) = outcome else {
            panic!("expected stations");
        };
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].id, 1);
    }

    #[tokio::test]
    async fn pm25_station_without_coordinates_aborts_request() {
        let partial: RawStation = serde_json::from_value(json!({
            "id": 9,
            "name": "No coords",
            "country": { "name": "Testland" },
            "sensors": [{ "parameter": { "name": "pm25" }, "value": 8 }],
        }))
        .unwrap();
        let mock = MockProvider::returning(vec![partial]);

        let err = service(&mock).air_quality(&AirQualityQuery::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(
            err,
            AirQualityError::DataIntegrity { ref station_id, .. } if station_id == "9"
        ));
    }
}
