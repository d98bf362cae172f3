//! Level data handlers.
//!
//! Both routes resolve a content hash to the stored SUS chart, parse it and
//! return the resulting level data, either as JSON or gzip-compressed JSON.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::State;
use sekai_core::{LevelData, gzip};

use crate::extract::Path;
use crate::handler::request::LevelPathParams;
use crate::handler::response::{ErrorResponse, GzipLevelData};
use crate::handler::{ErrorKind, Result};
use crate::service::{LevelDataService, ServiceState};

/// Tracing target for level operations.
const TRACING_TARGET: &str = "sekai_server::handler::levels";

/// Returns the level data parsed from the chart stored for a hash.
#[tracing::instrument(skip_all, fields(hash = %path_params.hash))]
async fn get_level(
    State(level_data): State<LevelDataService>,
    Path(path_params): Path<LevelPathParams>,
) -> Result<Json<LevelData>> {
    tracing::debug!(target: TRACING_TARGET, "Fetching level data");

    let level = level_data.fetch_level_data(&path_params.hash).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        entities = level.entities.len(),
        "Level data parsed"
    );

    Ok(Json(level))
}

fn get_level_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get level data")
        .description("Parses the SUS chart stored for the content hash and returns its level data.")
        .response::<200, Json<LevelData>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<500, Json<ErrorResponse>>()
}

/// Returns the level data as gzip-compressed JSON.
#[tracing::instrument(skip_all, fields(hash = %path_params.hash))]
async fn get_level_archive(
    State(level_data): State<LevelDataService>,
    Path(path_params): Path<LevelPathParams>,
) -> Result<GzipLevelData> {
    tracing::debug!(target: TRACING_TARGET, "Fetching compressed level data");

    let level = level_data.fetch_level_data(&path_params.hash).await?;

    let json = serde_json::to_string(&level).map_err(|err| {
        tracing::error!(target: TRACING_TARGET, error = %err, "Failed to serialize level data");
        ErrorKind::InternalServerError.with_context(err.to_string())
    })?;

    let compressed = tokio::task::spawn_blocking(move || gzip(&json))
        .await
        .map_err(|err| {
            tracing::error!(target: TRACING_TARGET, error = %err, "Compression task failed");
            ErrorKind::InternalServerError.with_context(err.to_string())
        })?
        .map_err(|err| {
            tracing::error!(target: TRACING_TARGET, error = %err, "Failed to compress level data");
            ErrorKind::InternalServerError.with_context(err.to_string())
        })?;

    tracing::debug!(
        target: TRACING_TARGET,
        size = compressed.len(),
        "Level data compressed"
    );

    Ok(GzipLevelData(compressed))
}

fn get_level_archive_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Download level data")
        .description("Returns the level data of the chart as gzip-compressed JSON.")
        .response::<200, GzipLevelData>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<500, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all level routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/levels/{hash}", get_with(get_level, get_level_docs))
        .api_route(
            "/levels/{hash}/data",
            get_with(get_level_archive, get_level_archive_docs),
        )
        .with_path_items(|item| item.tag("Levels"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sekai_core::{LevelDataEntity, ParseError, ParseResult, SusParser, gunzip};
    use sekai_opendal::FixtureStore;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::create_test_server_with_service;

    const CHART: &str = "#WAVEOFFSET 0.25\n#00002: 4\n#00010: 0014\n";

    #[tokio::test]
    async fn returns_level_json() -> anyhow::Result<()> {
        let store = FixtureStore::new().with_object("SusFile/abc", CHART);
        let server = create_test_server_with_service(LevelDataService::new(store, SusParser))?;

        let response = server.get("/levels/abc").await;
        response.assert_status_ok();

        let level = response.json::<LevelData>();
        assert_eq!(level.bgm_offset, 0.25);
        assert_eq!(level.archetype("TapNote").count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn returns_parser_output_unchanged() -> anyhow::Result<()> {
        let parser = |_: &str| -> ParseResult<LevelData> {
            let mut level = LevelData::new(2.0);
            level.push(LevelDataEntity::new("Custom").with_value("x", 1.0));
            Ok(level)
        };
        let store = FixtureStore::new().with_object("SusFile/abc", "anything");
        let server = create_test_server_with_service(LevelDataService::new(store, parser))?;

        let response = server.get("/levels/abc").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "bgmOffset": 2.0,
            "entities": [{"archetype": "Custom", "data": [{"name": "x", "value": 1.0}]}]
        }));

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_404() -> anyhow::Result<()> {
        let server = create_test_server_with_service(LevelDataService::new(
            FixtureStore::new(),
            SusParser,
        ))?;

        let response = server.get("/levels/missing").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({"error": "File not found", "code": "file_not_found"}));

        Ok(())
    }

    #[tokio::test]
    async fn no_such_key_ignores_other_fields() -> anyhow::Result<()> {
        let store = FixtureStore::new()
            .with_error("SusFile/abc", json!({"Code": "NoSuchKey"}))
            .with_error(
                "SusFile/def",
                json!({"Code": "NoSuchKey", "$metadata": {"httpStatusCode": 404}}),
            );
        let server = create_test_server_with_service(LevelDataService::new(store, SusParser))?;

        for path in ["/levels/abc", "/levels/def"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::NOT_FOUND);
            assert_eq!(response.json::<Value>()["code"], "file_not_found");
        }

        Ok(())
    }

    #[tokio::test]
    async fn store_failures_are_500() -> anyhow::Result<()> {
        let store = FixtureStore::new()
            .with_error(
                "SusFile/denied",
                json!({"Code": "AccessDenied", "$metadata": {"httpStatusCode": 403}}),
            )
            .with_error("SusFile/plain", json!("plain string error"));
        let server = create_test_server_with_service(LevelDataService::new(store, SusParser))?;

        for path in ["/levels/denied", "/levels/plain"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            response.assert_json(&json!({
                "error": "Internal Server Error",
                "code": "internal_server_error"
            }));
        }

        Ok(())
    }

    #[tokio::test]
    async fn parse_failures_map_by_message() -> anyhow::Result<()> {
        let missing_bar = |_: &str| -> ParseResult<LevelData> {
            Err(ParseError::other("Unexpected missing bar: line 4"))
        };
        let lowercase = |_: &str| -> ParseResult<LevelData> {
            Err(ParseError::other("unexpected missing bar"))
        };
        let store = FixtureStore::new().with_object("SusFile/abc", "#00010: 14");

        let server = create_test_server_with_service(LevelDataService::new(
            store.clone(),
            missing_bar,
        ))?;
        let response = server.get("/levels/abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "error": "Unexpected missing bar",
            "code": "unexpected_missing_bar"
        }));

        let server = create_test_server_with_service(LevelDataService::new(store, lowercase))?;
        let response = server.get("/levels/abc").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["code"], "internal_server_error");

        Ok(())
    }

    #[tokio::test]
    async fn archive_is_gzip_json() -> anyhow::Result<()> {
        let store = FixtureStore::new().with_object("SusFile/abc", CHART);
        let server = create_test_server_with_service(LevelDataService::new(store, SusParser))?;

        let response = server.get("/levels/abc/data").await;
        response.assert_status_ok();
        response.assert_header("content-type", "application/gzip");

        let text = gunzip(response.as_bytes())?;
        let level: LevelData = serde_json::from_str(&text)?;
        assert_eq!(level.bgm_offset, 0.25);

        Ok(())
    }

    #[tokio::test]
    async fn archive_uses_same_error_mapping() -> anyhow::Result<()> {
        let server = create_test_server_with_service(LevelDataService::new(
            FixtureStore::new(),
            SusParser,
        ))?;

        let response = server.get("/levels/missing/data").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "file_not_found");

        Ok(())
    }
}
