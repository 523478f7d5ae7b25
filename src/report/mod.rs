//! Report rendering.
//!
//! - `csv`: comma-joined tabular text
//! - `pdf`: paginated document with an embedded font
//! - `layout`: line placement and wrapping for the document

pub mod csv;
pub mod layout;
pub mod pdf;

use std::path::PathBuf;

use crate::error::RenderError;
use crate::models::{Commit, ExportFormat};

pub use pdf::DocumentRenderer;

/// A finished export ready to be served or written to disk.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn file_name(&self) -> String {
        self.format.file_name()
    }
}

pub struct ReportRenderer {
    document: DocumentRenderer,
}

impl ReportRenderer {
    pub fn new(font_path: impl Into<PathBuf>) -> Self {
        Self {
            document: DocumentRenderer::new(font_path),
        }
    }

    pub fn render(
        &self,
        commits: &[Commit],
        format: ExportFormat,
    ) -> Result<RenderedReport, RenderError> {
        if commits.is_empty() {
            return Err(RenderError::EmptyInput);
        }

        tracing::info!("Rendering {} commits as {}", commits.len(), format);
        let bytes = match format {
            ExportFormat::Tabular => csv::render(commits),
            ExportFormat::Document => self.document.render(commits)?,
        };
        tracing::debug!("Rendered {} bytes of {}", bytes.len(), format.content_type());

        Ok(RenderedReport { format, bytes })
    }
}
