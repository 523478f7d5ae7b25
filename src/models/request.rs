use serde::Deserialize;

use crate::models::Commit;

/// Body of `POST /api/analyze`. Fields are optional so that a missing
/// field surfaces as a validation error instead of a body rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub repo_paths: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Body of `POST /api/export`.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub commits: Vec<Commit>,
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_as_missing() {
        let analyze: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert!(analyze.repo_paths.is_none());
        assert!(analyze.start_date.is_none() && analyze.end_date.is_none());

        let export: ExportRequest = serde_json::from_str(r#"{"format":"csv"}"#).unwrap();
        assert!(export.commits.is_empty());
        assert_eq!(export.format.as_deref(), Some("csv"));
    }
}
