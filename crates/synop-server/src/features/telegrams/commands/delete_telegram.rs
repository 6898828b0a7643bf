//! Delete telegram command

use synop_common::schema::{validate_country_code, CountryCodeError};

use crate::error::AppError;
use crate::store::{StoreError, TelegramStore};

/// Command to delete a telegram by id
#[derive(Debug, Clone)]
pub struct DeleteTelegramCommand {
    pub collection: String,
    pub id_telegram: String,
}

/// Error type for the delete command
#[derive(Debug, thiserror::Error)]
pub enum DeleteTelegramError {
    #[error(transparent)]
    InvalidCollection(#[from] CountryCodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DeleteTelegramError> for AppError {
    fn from(err: DeleteTelegramError) -> Self {
        match err {
            DeleteTelegramError::InvalidCollection(e) => e.into(),
            DeleteTelegramError::Store(e) => e.into(),
        }
    }
}

/// Returns whether a telegram with the given id existed and was removed.
pub async fn handle(
    store: &TelegramStore,
    command: DeleteTelegramCommand,
) -> Result<bool, DeleteTelegramError> {
    validate_country_code(&command.collection)?;

    let collection = store.collection(&command.collection);
    Ok(store.delete(&collection, &command.id_telegram).await?)
}
