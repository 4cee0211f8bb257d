//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `From` where they need it.

use thiserror::Error;

/// The error type for `tsim-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tsim-core`.
pub type CoreResult<T> = Result<T, CoreError>;
