use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FONT_PATH: &str = "assets/fonts/Roboto-Regular.ttf";
pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 30;

/// Settings shared by the HTTP service and the `export` subcommand.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// TrueType font embedded into document reports.
    pub font_path: PathBuf,
    /// Upper bound on a single git invocation. Zero disables it.
    pub git_timeout: Duration,
}

impl ReportConfig {
    pub fn new(font_path: impl Into<PathBuf>, git_timeout_secs: u64) -> Self {
        Self {
            font_path: font_path.into(),
            git_timeout: Duration::from_secs(git_timeout_secs),
        }
    }
}
