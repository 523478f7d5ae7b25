//! Sequences extraction over several repositories and dispatches exports.

use std::sync::Arc;

use crate::config::ReportConfig;
use crate::error::{ExtractionError, RenderError};
use crate::git::{GitCli, GitRunner, HistoryExtractor};
use crate::models::{Commit, ExportFormat, RepositoryReport};
use crate::report::{RenderedReport, ReportRenderer};

pub struct Analyzer<G> {
    extractor: HistoryExtractor<G>,
    renderer: ReportRenderer,
}

pub type SharedAnalyzer<G = GitCli> = Arc<Analyzer<G>>;

impl Analyzer<GitCli> {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(GitCli::new(config.git_timeout), config)
    }
}

impl<G: GitRunner> Analyzer<G> {
    pub fn new(git: G, config: &ReportConfig) -> Self {
        Self {
            extractor: HistoryExtractor::new(git),
            renderer: ReportRenderer::new(config.font_path.clone()),
        }
    }

    /// Extract every repository in input order.
    ///
    /// The first failing path aborts the batch; reports already collected
    /// for earlier paths are discarded.
    pub async fn analyze(
        &self,
        repository_paths: &[String],
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<RepositoryReport>, ExtractionError> {
        let mut reports = Vec::with_capacity(repository_paths.len());

        for path in repository_paths {
            let commits = self
                .extractor
                .extract(path, start_date, end_date)
                .await
                .inspect_err(|e| tracing::error!("Error reading repo: {}: {}", path, e))?;

            reports.push(RepositoryReport {
                repo: path.clone(),
                commits,
            });
        }

        tracing::info!(
            "Analyzed {} repositories, {} commits",
            reports.len(),
            reports.iter().map(|r| r.commits.len()).sum::<usize>()
        );
        Ok(reports)
    }

    /// Render `commits` in the wire format named by `format` (`csv` or `pdf`).
    /// Emptiness is checked before the format.
    pub fn export(&self, commits: &[Commit], format: &str) -> Result<RenderedReport, RenderError> {
        if commits.is_empty() {
            return Err(RenderError::EmptyInput);
        }
        let format: ExportFormat = format.parse()?;
        self.renderer.render(commits, format)
    }
}

/// All commits of all reports, in report order.
pub fn flatten(reports: Vec<RepositoryReport>) -> Vec<Commit> {
    reports.into_iter().flat_map(|r| r.commits).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::git::runner::fake::{FakeGit, FakeRepo};

    const R1_LOG: &str = "a2|Bob|2024-01-05|a|b|c\na1|Alice|2024-01-02|fix bug\n";

    struct Fixture {
        _root: TempDir,
        r1: String,
        r2: String,
        r3: String,
    }

    /// `r1` and `r3` are repositories, `r2` is a plain directory.
    fn fixture() -> (Fixture, Analyzer<FakeGit>) {
        let root = tempfile::tempdir().unwrap();
        let dir = |name: &str| {
            let p = root.path().join(name);
            std::fs::create_dir(&p).unwrap();
            p
        };
        let (r1, r2, r3) = (dir("r1"), dir("r2"), dir("r3"));

        let git = FakeGit::default()
            .with_repo(&r1, FakeRepo::WorkTree(R1_LOG.to_string()))
            .with_repo(&r3, FakeRepo::WorkTree("c1|Carol|2024-01-03|docs\n".to_string()));
        let analyzer = Analyzer::new(git, &ReportConfig::new("/nonexistent/font.ttf", 0));

        let s = |p: &Path| p.to_string_lossy().into_owned();
        let fixture = Fixture {
            r1: s(&r1),
            r2: s(&r2),
            r3: s(&r3),
            _root: root,
        };
        (fixture, analyzer)
    }

    #[tokio::test]
    async fn reports_follow_input_order() {
        let (fx, analyzer) = fixture();
        let reports = analyzer
            .analyze(&[fx.r3.clone(), fx.r1.clone()], "2024-01-01", "2024-01-10")
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].repo, fx.r3);
        assert_eq!(reports[1].repo, fx.r1);
        assert_eq!(reports[1].commits[0].message, "a|b|c");

        let hashes: Vec<_> = flatten(reports).into_iter().map(|c| c.hash).collect();
        assert_eq!(hashes, ["c1", "a2", "a1"]);
    }

    #[tokio::test]
    async fn first_failure_aborts_the_batch() {
        let (fx, analyzer) = fixture();
        let err = analyzer
            .analyze(&[fx.r1.clone(), fx.r2.clone(), fx.r3.clone()], "2024-01-01", "2024-01-10")
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::NotARepository { ref path } if *path == fx.r2));
        let log_calls = analyzer
            .extractor_calls()
            .into_iter()
            .filter(|(dir, args)| args[0] == "log" && dir.to_string_lossy() == fx.r3)
            .count();
        assert_eq!(log_calls, 0);
    }

    #[tokio::test]
    async fn no_paths_no_reports() {
        let (_fx, analyzer) = fixture();
        let reports = analyzer.analyze(&[], "2024-01-01", "2024-01-10").await.unwrap();
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_tabular_export() {
        let (fx, analyzer) = fixture();
        let reports = analyzer
            .analyze(&[fx.r1.clone()], "2024-01-01", "2024-01-10")
            .await
            .unwrap();
        let report = analyzer.export(&flatten(reports), "csv").unwrap();

        let csv = String::from_utf8(report.bytes).unwrap();
        assert_eq!(csv, "a2,Bob,2024-01-05,a|b|c\na1,Alice,2024-01-02,fix bug");
    }

    #[test]
    fn export_checks_emptiness_before_format() {
        let (_fx, analyzer) = fixture();
        assert!(matches!(analyzer.export(&[], "txt"), Err(RenderError::EmptyInput)));
        assert!(matches!(analyzer.export(&[], "pdf"), Err(RenderError::EmptyInput)));
    }

    #[test]
    fn unsupported_format_produces_nothing() {
        let (_fx, analyzer) = fixture();
        let commits = vec![Commit {
            hash: "a1".into(),
            author_name: "Alice".into(),
            date: "2024-01-02".into(),
            message: "fix bug".into(),
        }];
        match analyzer.export(&commits, "txt") {
            Err(RenderError::UnsupportedFormat(format)) => assert_eq!(format, "txt"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    impl Analyzer<FakeGit> {
        fn extractor_calls(&self) -> Vec<(std::path::PathBuf, Vec<String>)> {
            self.extractor.git().calls()
        }
    }
}
