//! Telegram field schema and input validation.
//!
//! The set of fields a decoded telegram may carry is fixed by the SYNOP
//! domain. Partial updates and filter criteria are validated against this
//! enumeration so arbitrary caller-chosen keys never reach the store.

use thiserror::Error;

/// Every field name that may appear under a telegram record's `data`.
pub const TELEGRAM_FIELDS: &[&str] = &[
    "station_id",
    "year",
    "month",
    "day",
    "hour",
    "telegram",
    "temperature",
    "dew_point_temperature",
    "relative_humidity",
    "wind_dir",
    "wind_speed",
    "pressure",
    "sea_level_pressure",
    "maximum_temperature",
    "minimum_temperature",
    "precipitation_s1",
    "precipitation_s3",
    "pressure_tendency",
    "present_weather",
    "past_weather_1",
    "past_weather_2",
    "sunshine",
    "ground_state_snow",
    "ground_state",
];

#[inline]
pub fn is_telegram_field(name: &str) -> bool {
    TELEGRAM_FIELDS.contains(&name)
}

/// Errors from telegram field name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    #[error("Field name is required and cannot be empty")]
    Required,

    #[error("Unknown telegram field: {name}")]
    Unknown { name: String },
}

/// Validate a field name against the telegram schema
pub fn validate_telegram_field(name: &str) -> Result<(), FieldValidationError> {
    if name.is_empty() {
        return Err(FieldValidationError::Required);
    }
    if !is_telegram_field(name) {
        return Err(FieldValidationError::Unknown {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Maximum accepted length for a country code.
pub const MAX_COUNTRY_CODE_LEN: usize = 8;

/// Errors from country code validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    #[error("Country code is required and cannot be empty")]
    Required,

    #[error("Country code must be at most {max_length} characters")]
    TooLong { max_length: usize },

    #[error("Country code can only contain lowercase letters and digits")]
    InvalidFormat,
}

/// Validate a country code (collection name).
///
/// # Rules
/// - Must not be empty
/// - Must not exceed [`MAX_COUNTRY_CODE_LEN`] characters
/// - Must contain only lowercase ASCII letters and digits
pub fn validate_country_code(code: &str) -> Result<(), CountryCodeError> {
    if code.is_empty() {
        return Err(CountryCodeError::Required);
    }

    if code.len() > MAX_COUNTRY_CODE_LEN {
        return Err(CountryCodeError::TooLong {
            max_length: MAX_COUNTRY_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(CountryCodeError::InvalidFormat);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields() {
        assert!(is_telegram_field("temperature"));
        assert!(is_telegram_field("station_id"));
        assert!(is_telegram_field("ground_state_snow"));
        assert!(!is_telegram_field("id_telegram"));
        assert!(!is_telegram_field("$where"));
    }

    #[test]
    fn test_validate_telegram_field() {
        assert!(validate_telegram_field("pressure").is_ok());
        assert_eq!(
            validate_telegram_field(""),
            Err(FieldValidationError::Required)
        );
        assert_eq!(
            validate_telegram_field("humidity_pct"),
            Err(FieldValidationError::Unknown {
                name: "humidity_pct".to_string()
            })
        );
    }

    #[test]
    fn test_validate_country_code_valid() {
        assert!(validate_country_code("ua").is_ok());
        assert!(validate_country_code("bel").is_ok());
        assert!(validate_country_code("rus").is_ok());
        assert!(validate_country_code("md1").is_ok());
    }

    #[test]
    fn test_validate_country_code_invalid() {
        assert_eq!(validate_country_code(""), Err(CountryCodeError::Required));
        assert_eq!(
            validate_country_code("UA"),
            Err(CountryCodeError::InvalidFormat)
        );
        assert_eq!(
            validate_country_code("u a"),
            Err(CountryCodeError::InvalidFormat)
        );
        assert_eq!(
            validate_country_code("toolongcode"),
            Err(CountryCodeError::TooLong { max_length: 8 })
        );
    }
}
