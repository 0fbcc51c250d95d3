use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::AnswerSet;
use super::record::SubmissionRecord;
use super::report::render_text;
use super::service::{ScreeningService, ScreeningServiceError};
use super::storage::SubmissionStore;

pub const SUBMITTED_MESSAGE: &str = "Data screening berhasil disimpan";

/// Router builder exposing intake, score preview, catalog, and export endpoints.
pub fn screening_router<S>(service: Arc<ScreeningService<S>>) -> Router
where
    S: SubmissionStore + 'static,
{
    Router::new()
        .route("/api/v1/screening", post(submit_handler::<S>))
        .route("/api/v1/screening/score", post(score_handler::<S>))
        .route("/api/v1/screening/groups", get(groups_handler::<S>))
        .route("/api/v1/screening/export/text", post(export_text_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    axum::Json(answers): axum::Json<AnswerSet>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match service.submit(answers) {
        Ok(submission) => {
            let receipt = submission.receipt;
            let payload = json!({
                "success": true,
                "message": SUBMITTED_MESSAGE,
                "filename": format!("{}.txt", receipt.file_stem),
                "record": receipt.record,
                "bmi": receipt.bmi,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error @ ScreeningServiceError::Validation(_)) => {
            let payload = json!({
                "error": error.to_string(),
                "fields": error.fields(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    axum::Json(answers): axum::Json<AnswerSet>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let result = service.score(&answers);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn groups_handler<S>(State(service): State<Arc<ScreeningService<S>>>) -> Response
where
    S: SubmissionStore + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog().as_ref())).into_response()
}

pub(crate) async fn export_text_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    axum::Json(record): axum::Json<SubmissionRecord>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let document = render_text(&record, service.catalog());
    let disposition = format!("attachment; filename=\"{}.txt\"", record.file_stem());

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response()
}
