//! Telegram feature slice: ingestion trigger, point lookup, mutation, and
//! multi-criteria filtering of stored telegrams.

pub mod commands;
pub mod filter;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::telegram_routes;
