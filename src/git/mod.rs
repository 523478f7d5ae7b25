pub mod history;
pub mod runner;

pub use history::HistoryExtractor;
pub use runner::{GitCli, GitRunner};
