//! Feature modules implementing the SYNOP API
//!
//! Each feature is a vertical slice with its own commands (write
//! operations), queries (read operations), and routes.

pub mod telegrams;

use std::sync::Arc;

use axum::Router;

use crate::ingest::IngestPipeline;
use crate::store::TelegramStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Record store adapter over the PostgreSQL pool
    pub store: TelegramStore,
    /// Ingestion pipeline, shared with the scheduler
    pub pipeline: Arc<IngestPipeline>,
}

/// Creates the API router with all feature routes mounted
pub fn router(state: FeatureState) -> Router<()> {
    telegrams::telegram_routes().with_state(state)
}
