//! Data transfer objects shared by extraction, rendering and the API.
//!
//! - `commit`: Commit, RepositoryReport, ExportFormat
//! - `request`: AnalyzeRequest, ExportRequest request bodies

pub mod commit;
pub mod request;

pub use commit::*;
pub use request::*;
