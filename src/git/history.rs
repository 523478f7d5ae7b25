//! Commit history extraction.
//!
//! Validates that a path is a work tree, runs `git log` over a date window
//! and parses the pipe-delimited output into `Commit` records.

use std::path::Path;

use crate::error::{ExtractionError, GitCommandError};
use crate::git::runner::GitRunner;
use crate::models::Commit;

/// `%H|%an|%ad|%s`: hash, author name, author date, subject.
const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ad|%s";

pub struct HistoryExtractor<G> {
    git: G,
}

impl<G: GitRunner> HistoryExtractor<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    #[cfg(test)]
    pub fn git(&self) -> &G {
        &self.git
    }

    /// Commits with timestamps in `[start_date, end_date)`, newest first.
    ///
    /// Both bounds are handed to git's `--since`/`--until` untouched, so an
    /// inclusive last day needs an `end_date` one day later.
    pub async fn extract(
        &self,
        repository_path: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<Commit>, ExtractionError> {
        let dir = Path::new(repository_path);
        if !dir.is_dir() {
            return Err(ExtractionError::NotARepository {
                path: repository_path.to_string(),
            });
        }

        tracing::info!("Checking repo at: {}", repository_path);
        self.ensure_work_tree(dir, repository_path).await?;

        let args = vec![
            "log".to_string(),
            "--no-color".to_string(),
            LOG_FORMAT.to_string(),
            format!("--since={}", start_date),
            format!("--until={}", end_date),
        ];
        let raw = self
            .git
            .run(dir, &args)
            .await
            .map_err(|e| tool_failure(repository_path, e))?;

        let commits = parse_log(&raw);
        tracing::debug!("{}: parsed {} commits", repository_path, commits.len());
        Ok(commits)
    }

    async fn ensure_work_tree(&self, dir: &Path, path: &str) -> Result<(), ExtractionError> {
        let args = ["rev-parse".to_string(), "--is-inside-work-tree".to_string()];
        match self.git.run(dir, &args).await {
            Ok(out) if out.trim() == "true" => Ok(()),
            // Exits zero with "false" inside a .git directory
            Ok(_) | Err(GitCommandError::Failed { .. }) => Err(ExtractionError::NotARepository {
                path: path.to_string(),
            }),
            Err(e) => Err(tool_failure(path, e)),
        }
    }
}

fn tool_failure(path: &str, cause: GitCommandError) -> ExtractionError {
    ExtractionError::ToolInvocationFailed {
        path: path.to_string(),
        cause: cause.to_string(),
    }
}

/// Parse `LOG_FORMAT` output. The first three pipes separate fields and the
/// rest of the line is the message, so pipes in a subject survive. Lines
/// with fewer than four fields or an empty hash are dropped.
pub fn parse_log(raw: &str) -> Vec<Commit> {
    let mut dropped = 0usize;
    let commits: Vec<Commit> = raw
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let commit = parse_line(line);
            if commit.is_none() {
                dropped += 1;
            }
            commit
        })
        .collect();

    if dropped > 0 {
        tracing::warn!("Dropped {} malformed log lines", dropped);
    }
    commits
}

fn parse_line(line: &str) -> Option<Commit> {
    let mut parts = line.splitn(4, '|');
    let hash = parts.next().filter(|h| !h.is_empty())?;
    let author_name = parts.next()?;
    let date = parts.next()?;
    let message = parts.next()?;

    Some(Commit {
        hash: hash.to_string(),
        author_name: author_name.to_string(),
        date: date.to_string(),
        message: message.to_string(),
    })
}
