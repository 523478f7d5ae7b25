use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// One entry of a repository's history, as emitted by `git log`.
///
/// `date` is the tool's native date text and is never reparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub author_name: String,
    pub date: String,
    pub message: String,
}

/// A repository path with its commits, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryReport {
    pub repo: String,
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-joined text, one line per commit.
    Tabular,
    /// Paginated PDF document.
    Document,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Tabular => "text/csv",
            ExportFormat::Document => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Tabular => "csv",
            ExportFormat::Document => "pdf",
        }
    }

    pub fn file_name(self) -> String {
        format!("report.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Tabular),
            "pdf" => Ok(ExportFormat::Document),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_formats() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Tabular);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Document);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "txt".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(ref f) if f == "txt"));
        assert!("PDF".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn format_metadata() {
        assert_eq!(ExportFormat::Document.content_type(), "application/pdf");
        assert_eq!(ExportFormat::Tabular.file_name(), "report.csv");
    }

    #[test]
    fn commit_uses_snake_case_fields() {
        let json = r#"{"hash":"a1","author_name":"Alice","date":"2024-01-02","message":"fix bug"}"#;
        let commit: Commit = serde_json::from_str(json).unwrap();
        assert_eq!(commit.author_name, "Alice");
        assert_eq!(serde_json::to_string(&commit).unwrap(), json);
    }
}
