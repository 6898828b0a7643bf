//! Download command
//!
//! Synchronously runs the ingestion pipeline for one country. The same
//! pipeline the scheduler fires; a manual trigger may race a scheduled
//! run and converges through upsert idempotence.

use synop_common::schema::{validate_country_code, CountryCodeError};

use crate::error::AppError;
use crate::ingest::{IngestError, IngestPipeline};

/// Command to ingest the current batch for a country
#[derive(Debug, Clone)]
pub struct DownloadCommand {
    pub country_code: String,
}

/// Error type for the download command
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    InvalidCollection(#[from] CountryCodeError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<DownloadError> for AppError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::InvalidCollection(e) => e.into(),
            DownloadError::Ingest(e) => e.into(),
        }
    }
}

pub async fn handle(
    pipeline: &IngestPipeline,
    command: DownloadCommand,
) -> Result<usize, DownloadError> {
    validate_country_code(&command.country_code)?;
    Ok(pipeline.ingest(&command.country_code).await?)
}
