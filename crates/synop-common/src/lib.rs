//! SYNOP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and utilities for the SYNOP telegram service:
//!
//! - **obs**: the decoded observation value tree and the JSON sanitizer
//! - **schema**: the enumerated telegram field schema and input validation
//! - **logging**: tracing subscriber initialization shared by binaries

pub mod logging;
pub mod obs;
pub mod schema;

pub use obs::ObsValue;
