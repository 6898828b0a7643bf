//! Request types for the telegram feature.

use serde::{Deserialize, Serialize};

/// Query parameters for the manual download trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadParams {
    pub country_code: String,
}

/// Filter criteria for `/filter_telegrams`.
///
/// Every field is optional; absent criteria are omitted from the query
/// conjunction, not treated as "match null". `date` is `YYYYMMDD`;
/// `date_start`/`date_end` bound an inclusive date range. Scalar
/// observation fields are exact-match constraints against the stored
/// `data` fields of the same name. `fields_to_return` projects the
/// response down to the named sub-fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramFilter {
    pub country_code: Option<String>,
    pub station_id: Option<String>,
    pub date: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub hour: Option<i64>,
    pub temperature: Option<f64>,
    pub dew_point_temperature: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub wind_dir: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub sea_level_pressure: Option<f64>,
    pub maximum_temperature: Option<f64>,
    pub minimum_temperature: Option<f64>,
    pub precipitation_s1: Option<f64>,
    pub precipitation_s3: Option<f64>,
    pub pressure_tendency: Option<f64>,
    pub present_weather: Option<String>,
    pub past_weather_1: Option<String>,
    pub past_weather_2: Option<String>,
    pub sunshine: Option<f64>,
    pub ground_state_snow: Option<String>,
    pub ground_state: Option<String>,
    pub fields_to_return: Option<Vec<String>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_deserializes_partial_body() {
        let filter: TelegramFilter = serde_json::from_str(
            r#"{"country_code": "ua", "date": "20240901", "hour": 18,
                "fields_to_return": ["station_id", "temperature"]}"#,
        )
        .unwrap();

        assert_eq!(filter.country_code.as_deref(), Some("ua"));
        assert_eq!(filter.hour, Some(18));
        assert_eq!(
            filter.fields_to_return,
            Some(vec!["station_id".to_string(), "temperature".to_string()])
        );
        assert!(filter.temperature.is_none());
    }

    #[test]
    fn test_filter_hour_zero_is_distinct_from_unset() {
        let filter: TelegramFilter = serde_json::from_str(r#"{"hour": 0}"#).unwrap();
        assert_eq!(filter.hour, Some(0));

        let unset: TelegramFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(unset.hour, None);
    }
}
