use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::GitCommandError;

/// Capability to run the `git` tool inside a directory and capture stdout.
///
/// The extractor only depends on this trait, so tests can substitute a
/// scripted fake for the real process.
pub trait GitRunner: Send + Sync {
    fn run(
        &self,
        dir: &Path,
        args: &[String],
    ) -> impl Future<Output = Result<String, GitCommandError>> + Send;
}

/// Runs the system `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    timeout: Option<Duration>,
}

impl GitCli {
    /// A zero timeout disables the limit.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: (!timeout.is_zero()).then_some(timeout),
        }
    }
}

impl GitRunner for GitCli {
    async fn run(&self, dir: &Path, args: &[String]) -> Result<String, GitCommandError> {
        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!("git {} (in {})", args.join(" "), dir.display());

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| GitCommandError::TimedOut(limit))??,
            None => command.output().await?,
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(GitCommandError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_disables_limit() {
        assert!(GitCli::new(Duration::ZERO).timeout.is_none());
        assert_eq!(GitCli::new(Duration::from_secs(5)).timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn spawn_failure_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = GitCli::default()
            .run(&missing, &["--version".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, GitCommandError::Spawn(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_is_killed_at_the_limit() {
        if std::process::Command::new("git").arg("--version").output().is_err() {
            eprintln!("skipping: git not available");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let limit = Duration::from_secs(1);
        let args: Vec<String> = ["-c", "alias.stall=!sleep 10", "stall"]
            .into_iter()
            .map(String::from)
            .collect();

        let started = std::time::Instant::now();
        let err = GitCli::new(limit).run(dir.path(), &args).await.unwrap_err();

        assert!(matches!(err, GitCommandError::TimedOut(d) if d == limit), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(8));
    }
}
