//! Telegram ingestion.
//!
//! The pipeline pulls decoded observation reports from the external
//! decoder service and upserts them into the country's collection; the
//! scheduler fires the pipeline on the three-hourly synoptic slots with a
//! per-country minute stagger.

pub mod config;
pub mod pipeline;
pub mod processor;
pub mod scheduler;

pub use config::{CountrySchedule, IngestConfig};
pub use pipeline::{IngestError, IngestPipeline};
pub use processor::{DecodedTelegram, HttpDecoderClient, ProcessorError, TelegramProcessor};
pub use scheduler::IngestScheduler;
