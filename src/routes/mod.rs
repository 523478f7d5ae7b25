//! API route handlers - maps HTTP endpoints to the analyzer.
//!
//! - `analyze`: commit history for several repositories (POST /api/analyze)
//! - `export`: CSV or PDF download of a commit list (POST /api/export)

pub mod analyze;
pub mod export;

use axum::Router;

use crate::analyzer::SharedAnalyzer;
use crate::git::GitRunner;

pub fn create_router<G: GitRunner + 'static>(analyzer: SharedAnalyzer<G>) -> Router {
    Router::new()
        .merge(analyze::routes(analyzer.clone()))
        .merge(export::routes(analyzer))
}
