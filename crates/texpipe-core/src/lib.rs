//! texpipe-core: Common infrastructure for per-paper pipeline stages
//!
//! Provides the batch command template every stage implements, the file
//! helpers stages use to read inputs and append results, and logging and
//! progress reporting for the CLI.

pub mod command;
pub mod files;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use command::{BatchCommand, Command, Describe, Summary, WorkItem, run_batch};
pub use files::{
    FileContents, append_to_csv, clean_directory, find_files, read_csv, read_file_tolerant,
};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
