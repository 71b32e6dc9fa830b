//! Error types for the markdown-latex library.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Bibliography error: {0}")]
    Bibliography(#[from] BibliographyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while parsing input documents.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid front matter: {0}")]
    FrontMatter(String),
}

/// Errors from a bibliographic metadata source.
///
/// A `SourceError` is always per-source and non-fatal: the resolver logs it
/// and keeps querying the remaining sources and definitions.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Request(e.to_string())
    }
}

/// Errors while writing the bibliography store.
#[derive(Debug, Error)]
pub enum BibliographyError {
    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}
