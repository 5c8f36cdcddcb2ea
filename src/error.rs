//! Error types for the Kindred library.
//!
//! All errors are represented by the [`KindredError`] enum, which provides
//! detailed information about what went wrong.
//!
//! # Examples
//!
//! ```
//! use kindred::error::{KindredError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     // Return an error
//!     Err(KindredError::config("rf.mintf must be a positive integer"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Kindred operations.
///
/// This enum represents all possible errors that can occur in the Kindred
/// library. It uses the `thiserror` crate for automatic `Error` trait
/// implementation and provides convenient constructor methods for creating
/// specific error types.
#[derive(Error, Debug)]
pub enum KindredError {
    /// I/O errors surfaced by the host engine
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration (bad parameter values, unsupported combinations)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Index-related errors (missing documents, term vector faults)
    #[error("Index error: {0}")]
    Index(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query-related errors (synthesis, composition)
    #[error("Query error: {0}")]
    Query(String),

    /// Seed resolved to no input and no base query was supplied
    #[error("No matching input: {0}")]
    NoMatch(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with KindredError.
pub type Result<T> = std::result::Result<T, KindredError>;

impl KindredError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        KindredError::Config(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        KindredError::Index(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        KindredError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        KindredError::Query(msg.into())
    }

    /// Create a new no-match error.
    pub fn no_match<S: Into<String>>(msg: S) -> Self {
        KindredError::NoMatch(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        KindredError::Other(msg.into())
    }
}
