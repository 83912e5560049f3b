//! Ingestion handler

use axum::{
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use itemdrop_domain::ingestion::{IngestionError, IngestionServicePort};
use tracing::{debug, error, info, warn};

use crate::{
    dto::ingestion::{ErrorResponse, IngestRequest, IngestResponse, InternalErrorResponse},
    AppState,
};

/// Handle ingestion requests
///
/// The body is parsed by hand so that an absent body, an empty body or a
/// JSON `null` all count as `{}`. Bodies the extractor refuses (over the size
/// limit, broken stream) still answer with the JSON error shape.
#[utoipa::path(
    post,
    path = "/api/ingest",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Item ingested", body = IngestResponse),
        (status = 400, description = "Bad request - invalid JSON, missing user_id or invalid image_base64", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 413, description = "Image or request body too large", body = ErrorResponse),
        (status = 500, description = "Upload or insert failure; unanticipated failures use the internal_error shape", body = InternalErrorResponse)
    ),
    tag = "ingestion"
)]
pub async fn ingest_handler<S>(
    State(state): State<AppState<S>>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: IngestionServicePort + 'static,
{
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejecting unreadable ingest body");
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    let payload = match parse_body(&body) {
        Ok(payload) => payload,
        Err(err) => {
            debug!(error = %err, "Rejecting malformed ingest body");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid JSON body: {}", err),
            );
        }
    };

    info!(
        has_image = payload.image_base64.as_deref().is_some_and(|s| !s.is_empty()),
        "Received ingest request"
    );

    match state.ingestion_service.ingest(payload.into()).await {
        Ok(item_id) => {
            info!(item_id = %item_id, "Successfully ingested item");
            (
                StatusCode::OK,
                Json(IngestResponse {
                    ok: true,
                    item_id: item_id.to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            if err.is_client_error() {
                warn!(error = %err, "Rejected ingest request");
            } else {
                error!(error = ?err, "Failed to ingest item");
            }

            match err {
                IngestionError::MissingUserId | IngestionError::InvalidImage(_) => {
                    error_response(StatusCode::BAD_REQUEST, err.to_string())
                }
                IngestionError::ImageTooLarge { .. } => {
                    error_response(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
                }
                IngestionError::UploadFailed(msg) | IngestionError::InsertFailed(msg) => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, msg)
                }
            }
        }
    }
}

/// Fallback for every method other than POST on the ingest route
pub async fn method_not_allowed() -> Response {
    debug!("Rejecting ingest request with wrong method");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(ErrorResponse {
            error: "Method Not Allowed".to_string(),
        }),
    )
        .into_response()
}

fn parse_body(body: &[u8]) -> Result<IngestRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(IngestRequest::default());
    }
    serde_json::from_slice::<Option<IngestRequest>>(body).map(Option::unwrap_or_default)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
