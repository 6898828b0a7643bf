//! Record store adapter.
//!
//! Wraps the PostgreSQL pool behind the operations the rest of the service
//! needs: per-country collections, upsert-by-id, point get, delete, partial
//! field update, and filtered find with projection. One JSONB document per
//! observation; a collection is a partition key on the `telegrams` table
//! plus a row in the `country_collections` registry.
//!
//! The pool handle is constructed once at startup and injected here; no
//! component talks to the database around this adapter.

pub mod query;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use thiserror::Error;

use query::StoreQuery;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store failure kinds
///
/// There is deliberately no "not found" variant: absence is reported
/// through `Option`/`bool` return values, never through the error path.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// A stored telegram record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TelegramRecord {
    pub id_telegram: String,
    pub data: Value,
}

/// Handle for one country's partition of the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// SQL expression for the composed observation date of a record.
/// NULL (and therefore never matching) when any date field is absent.
const COMPOSED_DATE: &str =
    "((data->>'year')::int * 10000 + (data->>'month')::int * 100 + (data->>'day')::int)";

/// The record store adapter
#[derive(Clone)]
pub struct TelegramStore {
    pool: PgPool,
}

impl TelegramStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Handle for a country's collection without registering it. Reads
    /// against an unregistered collection simply find nothing.
    pub fn collection(&self, country_code: &str) -> Collection {
        Collection {
            name: country_code.to_string(),
        }
    }

    /// Returns the handle for a country's partition, registering it on
    /// first use.
    pub async fn get_or_create_collection(&self, country_code: &str) -> StoreResult<Collection> {
        sqlx::query(
            "INSERT INTO country_collections (country_code) VALUES ($1) \
             ON CONFLICT (country_code) DO NOTHING",
        )
        .bind(country_code)
        .execute(&self.pool)
        .await?;

        Ok(self.collection(country_code))
    }

    /// Every registered collection, in stable name order.
    pub async fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        let names: Vec<(String,)> =
            sqlx::query_as("SELECT country_code FROM country_collections ORDER BY country_code")
                .fetch_all(&self.pool)
                .await?;

        Ok(names
            .into_iter()
            .map(|(name,)| Collection { name })
            .collect())
    }

    /// Write `{id_telegram, data}`, replacing `data` in full if the id
    /// already exists. At most one record per `(collection, id)` after the
    /// call; repeating the call with identical input is a no-op.
    pub async fn upsert(
        &self,
        collection: &Collection,
        id_telegram: &str,
        data: &Value,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO telegrams (collection, id_telegram, data) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id_telegram) DO UPDATE SET data = EXCLUDED.data",
        )
        .bind(collection.name())
        .bind(id_telegram)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Point lookup by telegram id.
    pub async fn get(
        &self,
        collection: &Collection,
        id_telegram: &str,
    ) -> StoreResult<Option<TelegramRecord>> {
        let record = sqlx::query_as::<_, TelegramRecord>(
            "SELECT id_telegram, data FROM telegrams WHERE collection = $1 AND id_telegram = $2",
        )
        .bind(collection.name())
        .bind(id_telegram)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Removes at most one record; returns whether one was removed.
    pub async fn delete(&self, collection: &Collection, id_telegram: &str) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM telegrams WHERE collection = $1 AND id_telegram = $2")
                .bind(collection.name())
                .bind(id_telegram)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Merges the given field updates into an existing record's `data`
    /// (shallow merge; unlike upsert this never replaces untouched fields).
    /// Returns whether a matching record existed; never creates one.
    ///
    /// Field names must have been validated against the telegram schema by
    /// the caller.
    pub async fn update_fields(
        &self,
        collection: &Collection,
        id_telegram: &str,
        field_updates: &Map<String, Value>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE telegrams SET data = data || $3 \
             WHERE collection = $1 AND id_telegram = $2",
        )
        .bind(collection.name())
        .bind(id_telegram)
        .bind(Value::Object(field_updates.clone()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All records matching the query, each restricted to the requested
    /// projection if one is given. Result order is store-native and not
    /// guaranteed stable across calls.
    pub async fn find(
        &self,
        collection: &Collection,
        store_query: &StoreQuery,
        projection: Option<&[String]>,
    ) -> StoreResult<Vec<TelegramRecord>> {
        let mut sql =
            String::from("SELECT id_telegram, data FROM telegrams WHERE collection = $1");
        let mut bind_idx = 1;

        let has_equals = !store_query.equals.is_empty();
        if has_equals {
            bind_idx += 1;
            sql.push_str(&format!(" AND data @> ${bind_idx}"));
        }

        let range = store_query.date_range.unwrap_or(query::DateRange {
            start: None,
            end: None,
        });
        if range.start.is_some() {
            bind_idx += 1;
            sql.push_str(&format!(" AND {COMPOSED_DATE} >= ${bind_idx}"));
        }
        if range.end.is_some() {
            bind_idx += 1;
            sql.push_str(&format!(" AND {COMPOSED_DATE} <= ${bind_idx}"));
        }

        let mut db_query =
            sqlx::query_as::<_, TelegramRecord>(&sql).bind(collection.name().to_string());
        if has_equals {
            db_query = db_query.bind(Value::Object(store_query.equals.clone()));
        }
        if let Some(start) = range.start {
            db_query = db_query.bind(start);
        }
        if let Some(end) = range.end {
            db_query = db_query.bind(end);
        }

        let mut records = db_query.fetch_all(&self.pool).await?;

        if let Some(fields) = projection {
            for record in &mut records {
                project_data(&mut record.data, fields);
            }
        }

        Ok(records)
    }
}

/// Restrict a record's `data` object to the named fields. The identifier
/// lives outside `data` and is always kept.
fn project_data(data: &mut Value, fields: &[String]) {
    if let Value::Object(map) = data {
        map.retain(|key, _| fields.iter().any(|f| f == key));
    }
}
