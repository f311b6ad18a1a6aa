//! texpipe-store: Data directory layout for pipeline stages
//!
//! Every stage owns one numbered directory under the data root, and every
//! paper owns one child directory inside it, named by its normalized arXiv
//! identifier. Stages read their inputs from an earlier stage's directory
//! and write results into their own.

pub mod arxiv_id;
pub mod data_dir;
pub mod stage;

pub use arxiv_id::{ArxivId, SLASH_SUBSTITUTE, denormalize, normalize};
pub use data_dir::{DataDir, StageSummary};
pub use stage::StageName;
