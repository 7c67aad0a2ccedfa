use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use leafscan_core::{Overview, PredictionResult};
use leafscan_ledger::{Block, LedgerReader, LedgerWriter};
use leafscan_records::{AnalysisRecord, RecordStats};
use leafscan_types::{DiseaseClass, RequesterId};

use crate::auth::{Credentials, Identity};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub overview: Overview,
    pub stats: RecordStats,
    pub records: Vec<AnalysisRecord>,
    pub chain: Vec<Block>,
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn info_handler(State(state): State<AppState>) -> Json<Value> {
    let classes: Vec<&str> = DiseaseClass::ALL.iter().map(|c| c.as_str()).collect();
    Json(json!({
        "name": "leafscan-server",
        "version": env!("CARGO_PKG_VERSION"),
        "classifier": state.analyzer.classifier().name(),
        "classes": classes,
    }))
}

/// Open prediction endpoint.
pub async fn predict_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ServerResult<Json<PredictionResult>> {
    let requester = requester(&headers, &state.default_requester);
    let image = read_upload(multipart).await?;
    let result = state.analyzer.predict_for(&image, &requester).await?;
    Ok(Json(result))
}

/// Prediction endpoint for programmatic clients; requires `X-API-Key`.
pub async fn api_predict_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ServerResult<Json<PredictionResult>> {
    authenticate(&state, &headers).await?;
    let requester = requester(&headers, &state.api_requester);
    let image = read_upload(multipart).await?;
    let result = state.analyzer.predict_for(&image, &requester).await?;
    Ok(Json(result))
}

pub async fn dashboard_handler(State(state): State<AppState>) -> ServerResult<Json<Dashboard>> {
    let records = state.analyzer.records();
    Ok(Json(Dashboard {
        overview: state.analyzer.overview()?,
        stats: records.stats()?,
        records: records.list_records()?,
        chain: state.analyzer.ledger().chain()?,
    }))
}

pub async fn records_handler(
    State(state): State<AppState>,
) -> ServerResult<Json<Vec<AnalysisRecord>>> {
    Ok(Json(state.analyzer.records().list_records()?))
}

pub async fn ledger_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<Block>>> {
    Ok(Json(state.analyzer.ledger().chain()?))
}

pub async fn block_handler(
    State(state): State<AppState>,
    Path(index): Path<u64>,
) -> ServerResult<Json<Block>> {
    state
        .analyzer
        .ledger()
        .block(index)?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("block {index}")))
}

/// Close the tail block; requires `X-API-Key`.
pub async fn seal_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServerResult<Json<Block>> {
    let identity = authenticate(&state, &headers).await?;
    let block = state.analyzer.ledger().seal_block()?;
    info!(by = %identity.name, index = block.index, "block sealed on request");
    Ok(Json(block))
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> ServerResult<Identity> {
    state
        .auth
        .authenticate(&Credentials::from_headers(headers))
        .await
}

fn requester(headers: &HeaderMap, fallback: &str) -> RequesterId {
    let header = headers.get(USER_ID_HEADER).and_then(|v| v.to_str().ok());
    RequesterId::or_fallback(header, fallback)
}

/// Bytes of the `file` field; other fields are skipped.
async fn read_upload(mut multipart: Multipart) -> ServerResult<Bytes> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(upload_error)?;
        if bytes.is_empty() {
            return Err(ServerError::InvalidInput("No selected file".into()));
        }
        return Ok(bytes);
    }
    Err(ServerError::InvalidInput("No file part".into()))
}

fn upload_error(e: MultipartError) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge(e.body_text())
    } else {
        ServerError::InvalidInput(e.body_text())
    }
}
