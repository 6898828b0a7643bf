//! SYNOP Server Library
//!
//! HTTP service for ingesting and querying decoded meteorological
//! telegrams (SYNOP/AAXX reports).
//!
//! # Overview
//!
//! - **Ingestion**: a background scheduler fires the ingestion pipeline for
//!   each configured country on the three-hourly synoptic slots; the
//!   pipeline pulls decoded reports from the external decoder service and
//!   upserts them into per-country collections.
//! - **Query layer**: point lookup, deletion, and constrained partial
//!   update by composite telegram id, plus a multi-criteria filter endpoint
//!   that fans out across collections.
//! - **Store**: PostgreSQL via SQLx, one JSONB document per observation.
//!
//! # Framework Stack
//!
//! - **Axum**: HTTP routing and extraction
//! - **SQLx**: database access
//! - **Tokio**: runtime and background jobs

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod store;

// Re-export commonly used types
pub use error::AppError;
