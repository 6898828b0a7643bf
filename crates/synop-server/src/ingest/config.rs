//! Ingestion and scheduling configuration.

use serde::{Deserialize, Serialize};
use synop_common::schema::validate_country_code;

/// Default per-country schedule: three-hourly slots, staggered by five
/// minutes per country so concurrent runs never start at the same instant.
pub const DEFAULT_COUNTRIES: &str = "bel:15,rus:20,ua:25";

/// Default delay before the first scheduled check, giving the server time
/// to finish starting.
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 5;

/// One country's recurring job definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySchedule {
    pub country_code: String,
    /// Minute-of-hour offset within each synoptic slot (0-59).
    pub minute_offset: u32,
}

/// Main ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Whether scheduled ingestion is enabled
    pub enabled: bool,
    /// Recurring jobs, one per country
    pub countries: Vec<CountrySchedule>,
    /// Delay before the scheduler arms its jobs
    pub startup_delay_secs: u64,
}

impl IngestConfig {
    /// Load ingestion configuration from environment variables.
    ///
    /// - `INGEST_ENABLED`: enable scheduled ingestion (default: true)
    /// - `INGEST_COUNTRIES`: comma-separated `code:minute` pairs
    ///   (default: `bel:15,rus:20,ua:25`)
    /// - `INGEST_STARTUP_DELAY_SECS`: arm delay (default: 5)
    pub fn from_env() -> anyhow::Result<Self> {
        let countries_spec =
            std::env::var("INGEST_COUNTRIES").unwrap_or_else(|_| DEFAULT_COUNTRIES.to_string());

        let config = Self {
            enabled: std::env::var("INGEST_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            countries: parse_countries(&countries_spec)?,
            startup_delay_secs: std::env::var("INGEST_STARTUP_DELAY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_STARTUP_DELAY_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.enabled && self.countries.is_empty() {
            anyhow::bail!("INGEST_COUNTRIES cannot be empty when ingestion is enabled");
        }

        for schedule in &self.countries {
            validate_country_code(&schedule.country_code).map_err(|e| {
                anyhow::anyhow!("Invalid country code '{}': {}", schedule.country_code, e)
            })?;
            if schedule.minute_offset >= 60 {
                anyhow::bail!(
                    "Minute offset for '{}' must be 0-59, got {}",
                    schedule.country_code,
                    schedule.minute_offset
                );
            }
        }

        let mut codes: Vec<&str> = self
            .countries
            .iter()
            .map(|c| c.country_code.as_str())
            .collect();
        codes.sort_unstable();
        codes.dedup();
        if codes.len() != self.countries.len() {
            anyhow::bail!("Duplicate country code in INGEST_COUNTRIES");
        }

        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // DEFAULT_COUNTRIES is a valid literal, so this cannot fail.
            countries: parse_countries(DEFAULT_COUNTRIES).unwrap_or_default(),
            startup_delay_secs: DEFAULT_STARTUP_DELAY_SECS,
        }
    }
}

/// Parse a comma-separated list of `code:minute` pairs.
fn parse_countries(spec: &str) -> anyhow::Result<Vec<CountrySchedule>> {
    let mut countries = Vec::new();

    for entry in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (code, minute) = entry.split_once(':').ok_or_else(|| {
            anyhow::anyhow!("Invalid INGEST_COUNTRIES entry '{}': expected code:minute", entry)
        })?;
        let minute_offset: u32 = minute.trim().parse().map_err(|_| {
            anyhow::anyhow!("Invalid minute offset in INGEST_COUNTRIES entry '{}'", entry)
        })?;
        countries.push(CountrySchedule {
            country_code: code.trim().to_string(),
            minute_offset,
        });
    }

    Ok(countries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert!(config.enabled);
        assert_eq!(config.countries.len(), 3);
        assert_eq!(
            config.countries[0],
            CountrySchedule {
                country_code: "bel".to_string(),
                minute_offset: 15
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_countries() {
        let countries = parse_countries("ua:25, md:30").unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[1].country_code, "md");
        assert_eq!(countries[1].minute_offset, 30);
    }

    #[test]
    fn test_parse_countries_rejects_malformed() {
        assert!(parse_countries("ua").is_err());
        assert!(parse_countries("ua:late").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_minute_offset() {
        let config = IngestConfig {
            countries: vec![CountrySchedule {
                country_code: "ua".to_string(),
                minute_offset: 60,
            }],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_country() {
        let config = IngestConfig {
            countries: parse_countries("ua:10,ua:20").unwrap(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_code() {
        let config = IngestConfig {
            countries: parse_countries("UA:10").unwrap(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_empty_when_disabled() {
        let config = IngestConfig {
            enabled: false,
            countries: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
