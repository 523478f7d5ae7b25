//! Report download endpoint.
//!
//! POST /api/export { commits: [Commit], format: "pdf" | "csv" }
//!
//! Responds with the rendered bytes, `Content-Type` for the format and
//! `Content-Disposition: attachment; filename=report.<ext>`. Document
//! rendering runs on the blocking pool.

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::analyzer::SharedAnalyzer;
use crate::error::{AppError, Result};
use crate::git::GitRunner;
use crate::models::ExportRequest;

pub fn routes<G: GitRunner + 'static>(analyzer: SharedAnalyzer<G>) -> Router {
    Router::new()
        .route("/api/export", post(export::<G>))
        .with_state(analyzer)
}

async fn export<G: GitRunner + 'static>(
    State(analyzer): State<SharedAnalyzer<G>>,
    Json(request): Json<ExportRequest>,
) -> Result<Response> {
    let format = request.format.unwrap_or_default();
    let commits = request.commits;

    let report = tokio::task::spawn_blocking(move || analyzer.export(&commits, &format))
        .await
        .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;

    let headers = [
        (header::CONTENT_TYPE, report.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", report.file_name()),
        ),
    ];
    Ok((headers, report.bytes).into_response())
}
