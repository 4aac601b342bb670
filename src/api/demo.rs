use axum::{
    Json,
    extract::State,
};
use std::sync::Arc;

use super::{ApiError, AskRequest, BaseResponse, IngestRequest, IngestResultDto};
use crate::services::AskResult;
use crate::state::SharedState;

/// POST /v1/demo/add
/// Fetch a web page and store its embedded chunks in the vector store
pub async fn add_vector(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<IngestRequest>,
) -> Result<Json<BaseResponse<IngestResultDto>>, ApiError> {
    let inserted = state.ingest.ingest_url(&payload.url).await?;

    Ok(Json(BaseResponse::ok(IngestResultDto { inserted })))
}

/// POST /v1/demo/ask
/// Answer a question from previously ingested content
pub async fn ask(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<BaseResponse<AskResult>>, ApiError> {
    let result = state.ingest.ask(&payload.question, payload.top_k).await?;

    Ok(Json(BaseResponse::ok(result)))
}
