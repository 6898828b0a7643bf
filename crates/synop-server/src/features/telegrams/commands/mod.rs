//! Write operations for the telegram feature.

pub mod delete_telegram;
pub mod download;
pub mod update_telegram;

pub use delete_telegram::{DeleteTelegramCommand, DeleteTelegramError};
pub use download::{DownloadCommand, DownloadError};
pub use update_telegram::{UpdateTelegramCommand, UpdateTelegramError};
