//! without-rowid - marks annotated tables in a generated SQL schema dump as `WITHOUT ROWID`
//!
//! The annotation reader collects the table names flagged in a schema source,
//! then the SQL rewriter streams the dump and rewrites the closing line of each
//! flagged `CREATE TABLE` block.

pub mod annotation;
pub mod config;
pub mod core;
pub mod rewrite;
pub mod utils;

pub use annotation::{read_annotations, AnnotationReader, AnnotationSet};
pub use config::Config;
pub use crate::core::{RewriteError, RewriteResult};
pub use rewrite::{rewrite_file, rewrite_str, BlockState, RewriteSummary, SqlRewriter};
