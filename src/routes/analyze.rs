//! History extraction endpoint.
//!
//! POST /api/analyze { repoPaths: [string], startDate: string, endDate: string }
//!
//! Returns one `{ repo, commits }` entry per path, in request order. The
//! dates go straight to git's `--since`/`--until` filters.

use axum::{Json, Router, extract::State, routing::post};

use crate::analyzer::SharedAnalyzer;
use crate::error::{AppError, Result};
use crate::git::GitRunner;
use crate::models::{AnalyzeRequest, RepositoryReport};

pub fn routes<G: GitRunner + 'static>(analyzer: SharedAnalyzer<G>) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze::<G>))
        .with_state(analyzer)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn analyze<G: GitRunner + 'static>(
    State(analyzer): State<SharedAnalyzer<G>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Vec<RepositoryReport>>> {
    let (Some(repo_paths), Some(start_date), Some(end_date)) = (
        request.repo_paths,
        present(request.start_date),
        present(request.end_date),
    ) else {
        return Err(AppError::Validation("Missing required fields.".to_string()));
    };

    let reports = analyzer.analyze(&repo_paths, &start_date, &end_date).await?;
    Ok(Json(reports))
}
