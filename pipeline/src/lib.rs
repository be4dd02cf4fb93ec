pub mod config;
pub mod error;
pub mod listing;
pub mod runner;
pub mod writer;

pub use config::{CONFIG_FILE_NAME, DEFAULT_INDEX_WIDTH, MAX_INDEX_WIDTH, SplitConfig};
pub use error::{Result, SplitError};
pub use listing::{chunk_dirs, chunk_files};
pub use runner::{BatchReport, DocumentOutcome, DocumentReport, Splitter};
pub use writer::{WriteOutcome, chunk_file_name, write_chunks};
