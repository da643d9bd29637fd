pub mod error;

pub use error::{RewriteError, RewriteResult};
