//! Update telegram command
//!
//! Partial update of one telegram's decoded fields. Field names are
//! checked against the telegram schema before any store access; unknown
//! names are rejected wholesale rather than merged partially.

use serde_json::{Map, Value};

use synop_common::schema::{
    validate_country_code, validate_telegram_field, CountryCodeError, FieldValidationError,
};

use crate::error::AppError;
use crate::store::{StoreError, TelegramStore};

/// Command to update fields of a stored telegram
#[derive(Debug, Clone)]
pub struct UpdateTelegramCommand {
    pub collection: String,
    pub id_telegram: String,
    pub field_updates: Map<String, Value>,
}

/// Error type for the update command
#[derive(Debug, thiserror::Error)]
pub enum UpdateTelegramError {
    #[error(transparent)]
    InvalidCollection(#[from] CountryCodeError),

    #[error(transparent)]
    Field(#[from] FieldValidationError),

    #[error("No fields to update")]
    Empty,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UpdateTelegramError> for AppError {
    fn from(err: UpdateTelegramError) -> Self {
        match err {
            UpdateTelegramError::InvalidCollection(e) => e.into(),
            UpdateTelegramError::Field(e) => e.into(),
            UpdateTelegramError::Empty => AppError::Validation(err.to_string()),
            UpdateTelegramError::Store(e) => e.into(),
        }
    }
}

/// Returns whether a telegram with the given id existed and was updated.
pub async fn handle(
    store: &TelegramStore,
    command: UpdateTelegramCommand,
) -> Result<bool, UpdateTelegramError> {
    validate_country_code(&command.collection)?;

    if command.field_updates.is_empty() {
        return Err(UpdateTelegramError::Empty);
    }
    for field in command.field_updates.keys() {
        validate_telegram_field(field)?;
    }

    let collection = store.collection(&command.collection);
    Ok(store
        .update_fields(&collection, &command.id_telegram, &command.field_updates)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::postgres::PgPool;

    fn lazy_store() -> TelegramStore {
        let pool = PgPool::connect_lazy("postgresql://localhost/unused")
            .expect("lazy pool construction cannot fail");
        TelegramStore::new(pool)
    }

    #[tokio::test]
    async fn test_unknown_field_rejected_before_store_access() {
        let mut updates = Map::new();
        updates.insert("no_such_field".to_string(), json!(1.0));

        let result = handle(
            &lazy_store(),
            UpdateTelegramCommand {
                collection: "ua".to_string(),
                id_telegram: "3450420249218".to_string(),
                field_updates: updates,
            },
        )
        .await;

        assert!(matches!(result, Err(UpdateTelegramError::Field(_))));
    }

    #[tokio::test]
    async fn test_empty_update_rejected() {
        let result = handle(
            &lazy_store(),
            UpdateTelegramCommand {
                collection: "ua".to_string(),
                id_telegram: "3450420249218".to_string(),
                field_updates: Map::new(),
            },
        )
        .await;

        assert!(matches!(result, Err(UpdateTelegramError::Empty)));
    }

    #[tokio::test]
    async fn test_invalid_collection_rejected_first() {
        let mut updates = Map::new();
        updates.insert("temperature".to_string(), json!(21.5));

        let result = handle(
            &lazy_store(),
            UpdateTelegramCommand {
                collection: "UA!".to_string(),
                id_telegram: "x".to_string(),
                field_updates: updates,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(UpdateTelegramError::InvalidCollection(_))
        ));
    }
}
