//! Read operations for the telegram feature.

pub mod filter_telegrams;
pub mod get_telegram;

pub use filter_telegrams::{FilterOutcome, FilterTelegramsError};
pub use get_telegram::{GetTelegramError, GetTelegramQuery};
