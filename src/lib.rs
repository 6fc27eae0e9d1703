//! awsm-md - An extended Markdown dialect and its HTML renderer
//!
//! The [`markdown`] module holds the dialect preprocessor, heading index and
//! renderer; the remaining modules are the configuration, error and file
//! handling used by the `awsm-md` command line tool.

pub mod config;
pub mod error;
pub mod file_handler;
pub mod markdown;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use markdown::{MarkdownExporter, MarkdownRenderer, Preprocessor};
