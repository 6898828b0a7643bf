//! Filter telegrams query
//!
//! Executes a filter plan: resolves the target collections, queries each
//! independently, and concatenates the results in collection-iteration
//! order. A failure in any collection aborts the whole fan-out; partial
//! results are never returned silently.

use tracing::debug;

use synop_common::schema::{validate_country_code, CountryCodeError};

use super::super::filter::{build_plan, TargetCollections};
use super::super::types::TelegramFilter;
use crate::error::AppError;
use crate::store::{StoreError, TelegramRecord, TelegramStore};

/// Outcome of a filter request. An empty result set is a distinct
/// outcome, never confusable with a store error.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Found(Vec<TelegramRecord>),
    NoData,
}

/// Error type for the filter query
#[derive(Debug, thiserror::Error)]
pub enum FilterTelegramsError {
    #[error(transparent)]
    InvalidCollection(#[from] CountryCodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FilterTelegramsError> for AppError {
    fn from(err: FilterTelegramsError) -> Self {
        match err {
            FilterTelegramsError::InvalidCollection(e) => e.into(),
            FilterTelegramsError::Store(e) => e.into(),
        }
    }
}

pub async fn handle(
    store: &TelegramStore,
    filter: TelegramFilter,
) -> Result<FilterOutcome, FilterTelegramsError> {
    let plan = build_plan(&filter);

    let collections = match &plan.target {
        TargetCollections::One(code) => {
            validate_country_code(code)?;
            vec![store.collection(code)]
        }
        TargetCollections::All => store.list_collections().await?,
    };

    let mut results = Vec::new();
    for collection in &collections {
        let records = store
            .find(collection, &plan.query, plan.projection.as_deref())
            .await?;
        debug!(
            collection = collection.name(),
            matches = records.len(),
            "Filter query executed"
        );
        results.extend(records);
    }

    if results.is_empty() {
        Ok(FilterOutcome::NoData)
    } else {
        Ok(FilterOutcome::Found(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPool;

    #[tokio::test]
    async fn test_invalid_country_code_rejected_before_querying() {
        let pool = PgPool::connect_lazy("postgresql://localhost/unused")
            .expect("lazy pool construction cannot fail");
        let store = TelegramStore::new(pool);

        let filter = TelegramFilter {
            country_code: Some("UA".to_string()),
            ..Default::default()
        };

        let result = handle(&store, filter).await;
        assert!(matches!(
            result,
            Err(FilterTelegramsError::InvalidCollection(_))
        ));
    }
}
