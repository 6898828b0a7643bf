//! Ingestion pipeline.
//!
//! One run: invoke the processor for a country, normalize each record
//! (identifier extraction, duplicate-id stripping, sanitization), and
//! upsert into the country's collection. Fail-fast with no rollback:
//! records written before a failure stay written.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::processor::{DecodedTelegram, ProcessorError, TelegramProcessor};
use crate::store::{StoreError, TelegramStore};
use serde_json::Value;
use synop_common::ObsValue;

/// Ingestion failure kinds
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("record {index} has no id_telegram and no fields to compose one from")]
    MissingId { index: usize },
}

/// The ingestion pipeline
pub struct IngestPipeline {
    store: TelegramStore,
    processor: Arc<dyn TelegramProcessor>,
}

impl IngestPipeline {
    pub fn new(store: TelegramStore, processor: Arc<dyn TelegramProcessor>) -> Self {
        Self { store, processor }
    }

    /// Ingest the current batch for one country; returns the number of
    /// records processed.
    ///
    /// Duplicate ids within one batch each overwrite the previous write
    /// (last in decoder order wins); concurrent runs for the same country
    /// converge the same way because every write is an idempotent upsert.
    pub async fn ingest(&self, country_code: &str) -> Result<usize, IngestError> {
        let records = self.processor.process_telegrams(country_code).await?;
        let collection = self.store.get_or_create_collection(country_code).await?;

        let mut count = 0;
        for (index, record) in records.into_iter().enumerate() {
            let (id_telegram, data) = prepare_record(record, index)?;
            self.store.upsert(&collection, &id_telegram, &data).await?;
            count += 1;
        }

        info!(country_code, records = count, "Processed telegrams");
        Ok(count)
    }
}

/// Normalize one decoded record into its stored form.
///
/// The identifier is stored once at the record's top level: a duplicated
/// `id_telegram` key inside `data` is removed. A blank identifier is
/// composed from the station/date fields. The payload is sanitized so no
/// non-finite float reaches the store.
pub(crate) fn prepare_record(
    record: DecodedTelegram,
    index: usize,
) -> Result<(String, Value), IngestError> {
    let mut data = record.data;
    data.remove("id_telegram");

    let id_telegram = if record.id_telegram.trim().is_empty() {
        compose_id(&data).ok_or(IngestError::MissingId { index })?
    } else {
        record.id_telegram
    };

    Ok((id_telegram, data.sanitize().into_json()))
}

/// Compose the identifier from station id + year + month + day + hour,
/// concatenated without padding (e.g. "34504" + 2024 + 9 + 2 + 18 =>
/// "3450420249218").
fn compose_id(data: &ObsValue) -> Option<String> {
    let station_id = data.get("station_id")?.as_str()?;
    let year = data.get("year")?.as_int()?;
    let month = data.get("month")?.as_int()?;
    let day = data.get("day")?.as_int()?;
    let hour = data.get("hour")?.as_int()?;

    Some(format!("{station_id}{year}{month}{day}{hour}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, data: serde_json::Value) -> DecodedTelegram {
        DecodedTelegram {
            id_telegram: id.to_string(),
            data: ObsValue::from(data),
        }
    }

    #[test]
    fn test_prepare_strips_duplicated_id_from_data() {
        let (id, data) = prepare_record(
            record(
                "3450420249218",
                json!({"id_telegram": "3450420249218", "station_id": "34504", "hour": 18}),
            ),
            0,
        )
        .unwrap();

        assert_eq!(id, "3450420249218");
        assert_eq!(data, json!({"station_id": "34504", "hour": 18}));
    }

    #[test]
    fn test_prepare_composes_missing_id() {
        let (id, _) = prepare_record(
            record(
                "",
                json!({"station_id": "34504", "year": 2024, "month": 9, "day": 2, "hour": 18}),
            ),
            0,
        )
        .unwrap();

        assert_eq!(id, "3450420249218");
    }

    #[test]
    fn test_prepare_fails_without_id_or_date_fields() {
        let result = prepare_record(record("", json!({"temperature": 25.1})), 3);
        assert!(matches!(result, Err(IngestError::MissingId { index: 3 })));
    }

    #[test]
    fn test_prepare_sanitizes_payload() {
        let input = DecodedTelegram {
            id_telegram: "x".to_string(),
            data: ObsValue::Map(vec![
                ("temperature".into(), ObsValue::Float(f64::NAN)),
                ("pressure".into(), ObsValue::Float(998.9)),
            ]),
        };

        let (_, data) = prepare_record(input, 0).unwrap();
        assert_eq!(data, json!({"temperature": null, "pressure": 998.9}));
    }
}
