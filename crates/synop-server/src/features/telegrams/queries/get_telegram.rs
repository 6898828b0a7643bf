//! Get telegram query
//!
//! Point lookup of one telegram by collection and composite id.

use synop_common::schema::{validate_country_code, CountryCodeError};

use crate::error::AppError;
use crate::store::{StoreError, TelegramRecord, TelegramStore};

/// Query to get a telegram by id
#[derive(Debug, Clone)]
pub struct GetTelegramQuery {
    pub collection: String,
    pub id_telegram: String,
}

/// Error type for the get telegram query
#[derive(Debug, thiserror::Error)]
pub enum GetTelegramError {
    #[error(transparent)]
    InvalidCollection(#[from] CountryCodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GetTelegramError> for AppError {
    fn from(err: GetTelegramError) -> Self {
        match err {
            GetTelegramError::InvalidCollection(e) => e.into(),
            GetTelegramError::Store(e) => e.into(),
        }
    }
}

/// Absence is `Ok(None)`, not an error: the route turns it into the
/// not-found sentinel payload.
pub async fn handle(
    store: &TelegramStore,
    query: GetTelegramQuery,
) -> Result<Option<TelegramRecord>, GetTelegramError> {
    validate_country_code(&query.collection)?;

    let collection = store.collection(&query.collection);
    Ok(store.get(&collection, &query.id_telegram).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn test_invalid_collection_rejected_before_store_access() {
        // A lazy pool never connects unless a query runs.
        let pool = PgPool::connect_lazy("postgresql://localhost/unused")
            .expect("lazy pool construction cannot fail");
        let store = TelegramStore::new(pool);

        let result = handle(
            &store,
            GetTelegramQuery {
                collection: "Not A Code".to_string(),
                id_telegram: "x".to_string(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(GetTelegramError::InvalidCollection(_))
        ));
    }
}
