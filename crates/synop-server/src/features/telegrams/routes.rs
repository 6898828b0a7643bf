//! Telegram routes
//!
//! HTTP surface of the telegram feature: a manual ingestion trigger,
//! point lookup/update/delete by composite id, and the multi-criteria
//! filter endpoint.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};

use super::commands::{
    delete_telegram::handle as handle_delete, download::handle as handle_download,
    update_telegram::handle as handle_update, DeleteTelegramCommand, DownloadCommand,
    UpdateTelegramCommand,
};
use super::queries::{
    filter_telegrams::handle as handle_filter, get_telegram::handle as handle_get, FilterOutcome,
    GetTelegramQuery,
};
use super::types::{DownloadParams, TelegramFilter};
use crate::error::AppError;
use crate::features::FeatureState;

/// Create telegram routes
pub fn telegram_routes() -> Router<FeatureState> {
    Router::new()
        .route("/download_telegrams", post(download_telegrams))
        .route(
            "/telegram/:collection_name/:id_telegram",
            get(get_telegram)
                .put(update_telegram)
                .delete(delete_telegram),
        )
        // Registered with and without the trailing slash so clients that
        // append one are not redirected on a POST.
        .route("/filter_telegrams", post(filter_telegrams))
        .route("/filter_telegrams/", post(filter_telegrams))
}

/// Trigger an immediate ingestion run for one country
///
/// POST /download_telegrams?country_code=ua
async fn download_telegrams(
    State(state): State<FeatureState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, AppError> {
    let country_code = params.country_code.clone();
    let count = handle_download(
        &state.pipeline,
        DownloadCommand {
            country_code: params.country_code,
        },
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("Successfully downloaded {count} telegrams for {country_code}")
        })),
    )
        .into_response())
}

/// Get a single telegram by composite id
///
/// GET /telegram/:collection_name/:id_telegram
async fn get_telegram(
    State(state): State<FeatureState>,
    Path((collection_name, id_telegram)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let record = handle_get(
        &state.store,
        GetTelegramQuery {
            collection: collection_name,
            id_telegram,
        },
    )
    .await?;

    match record {
        Some(record) => Ok((StatusCode::OK, Json(json!(record))).into_response()),
        None => Ok((
            StatusCode::OK,
            Json(json!({"message": "No data for this period"})),
        )
            .into_response()),
    }
}

/// Update fields of a stored telegram
///
/// PUT /telegram/:collection_name/:id_telegram
async fn update_telegram(
    State(state): State<FeatureState>,
    Path((collection_name, id_telegram)): Path<(String, String)>,
    Json(field_updates): Json<Map<String, Value>>,
) -> Result<Response, AppError> {
    let updated = handle_update(
        &state.store,
        UpdateTelegramCommand {
            collection: collection_name,
            id_telegram,
            field_updates,
        },
    )
    .await?;

    let message = if updated {
        "Data updated successfully"
    } else {
        "No data found for this id"
    };
    Ok((StatusCode::OK, Json(json!({"message": message}))).into_response())
}

/// Delete a stored telegram
///
/// DELETE /telegram/:collection_name/:id_telegram
async fn delete_telegram(
    State(state): State<FeatureState>,
    Path((collection_name, id_telegram)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let deleted = handle_delete(
        &state.store,
        DeleteTelegramCommand {
            collection: collection_name,
            id_telegram,
        },
    )
    .await?;

    let message = if deleted {
        "Data deleted successfully"
    } else {
        "No data found for this id"
    };
    Ok((StatusCode::OK, Json(json!({"message": message}))).into_response())
}

/// Multi-criteria search across one or all collections
///
/// POST /filter_telegrams
async fn filter_telegrams(
    State(state): State<FeatureState>,
    Json(filter): Json<TelegramFilter>,
) -> Result<Response, AppError> {
    match handle_filter(&state.store, filter).await? {
        FilterOutcome::Found(records) => {
            Ok((StatusCode::OK, Json(json!({"results": records}))).into_response())
        }
        FilterOutcome::NoData => Ok((
            StatusCode::OK,
            Json(json!({"message": "No data found for the given filters"})),
        )
            .into_response()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use sqlx::postgres::PgPool;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::ingest::{DecodedTelegram, IngestPipeline, ProcessorError, TelegramProcessor};
    use crate::store::TelegramStore;

    struct NoopProcessor;

    #[async_trait]
    impl TelegramProcessor for NoopProcessor {
        async fn process_telegrams(
            &self,
            _country_code: &str,
        ) -> Result<Vec<DecodedTelegram>, ProcessorError> {
            Ok(Vec::new())
        }
    }

    /// State over a lazy pool: requests that fail validation never reach
    /// the database, so these tests need no running PostgreSQL.
    fn test_state() -> FeatureState {
        let pool = PgPool::connect_lazy("postgresql://localhost/unused")
            .expect("lazy pool construction cannot fail");
        let store = TelegramStore::new(pool);
        let pipeline = Arc::new(IngestPipeline::new(store.clone(), Arc::new(NoopProcessor)));
        FeatureState { store, pipeline }
    }

    #[tokio::test]
    async fn test_get_with_invalid_collection_is_bad_request() {
        let app = telegram_routes().with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/telegram/NotACode/3450420249218")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_filter_trailing_slash_reaches_handler() {
        let app = telegram_routes().with_state(test_state());

        // An uppercase country code fails validation inside the handler,
        // so a 400 (not a 404 or redirect) proves the route is wired.
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/filter_telegrams/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"country_code": "UA"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_with_unknown_field_is_bad_request() {
        let app = telegram_routes().with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/telegram/ua/3450420249218")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"no_such_field": 1.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
