//! External telegram processor.
//!
//! Raw telegram decoding is not this service's concern; a decoder service
//! turns raw SYNOP text into structured per-observation records. The
//! [`TelegramProcessor`] trait is the seam, [`HttpDecoderClient`] the
//! production implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::DecoderConfig;
use synop_common::ObsValue;

/// One decoded observation report as delivered by the processor.
///
/// `id_telegram` may be blank when the decoder did not compose one; the
/// pipeline derives it from the data fields in that case. `data` may still
/// contain a duplicated `id_telegram` key, which the pipeline strips.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTelegram {
    pub id_telegram: String,
    pub data: ObsValue,
}

/// Processor failure kinds
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("decoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("decoder returned malformed payload: {0}")]
    Malformed(String),
}

/// Black-box capability producing decoded telegrams for one country.
#[async_trait]
pub trait TelegramProcessor: Send + Sync {
    /// Decode the current synoptic slot's telegrams for `country_code`,
    /// one record per observation, in decoder order.
    async fn process_telegrams(
        &self,
        country_code: &str,
    ) -> Result<Vec<DecodedTelegram>, ProcessorError>;
}

/// HTTP client for the telegram decoder service.
pub struct HttpDecoderClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDecoderClient {
    pub fn new(config: &DecoderConfig) -> Result<Self, ProcessorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TelegramProcessor for HttpDecoderClient {
    async fn process_telegrams(
        &self,
        country_code: &str,
    ) -> Result<Vec<DecodedTelegram>, ProcessorError> {
        let url = format!("{}/telegrams/{}", self.base_url, country_code);
        debug!(%url, "Requesting decoded telegrams");

        let payload: Vec<Value> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        payload.into_iter().map(decoded_from_json).collect()
    }
}

/// Convert one decoder record into a [`DecodedTelegram`].
fn decoded_from_json(value: Value) -> Result<DecodedTelegram, ProcessorError> {
    if !value.is_object() {
        return Err(ProcessorError::Malformed(format!(
            "expected a JSON object per record, got {value}"
        )));
    }

    let id_telegram = value
        .get("id_telegram")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(DecodedTelegram {
        id_telegram,
        data: ObsValue::from(value),
    })
}
